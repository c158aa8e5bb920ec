//! Project configuration (`.pr-conventions.yaml`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checks::{default_label_rules, LabelRule, LinkedIssueRules};
use crate::conventional::TitleRules;
use crate::data::{read_yaml_file, write_yaml_file};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".pr-conventions.yaml";

/// Effective configuration for all jobs. Missing sections take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Title job rules.
    pub title: TitleRules,
    /// Linked-issue job rules.
    pub linked_issues: LinkedIssueRules,
    /// Label rules in evaluation order.
    pub labels: Vec<LabelRule>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            title: TitleRules::default(),
            linked_issues: LinkedIssueRules::default(),
            labels: default_label_rules(),
        }
    }
}

impl ProjectConfig {
    /// Loads the config from `explicit`, or from [`CONFIG_FILE_NAME`] in the
    /// current directory, or falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match resolve_config_path(explicit, &cwd)? {
            Some(path) => Self::load_from_path(path),
            None => {
                debug!("No project config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads the config from a specific file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading project config");
        read_yaml_file(path)
    }

    /// Writes the config as YAML. Refuses to overwrite unless `force` is set.
    pub fn save<P: AsRef<Path>>(&self, path: P, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                path.display()
            );
        }
        write_yaml_file(self, path)
    }
}

/// Picks the config file: the explicit path (which must exist), else
/// [`CONFIG_FILE_NAME`] in `dir` if present.
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidate = dir.join(CONFIG_FILE_NAME);
    Ok(candidate.is_file().then_some(candidate))
}
