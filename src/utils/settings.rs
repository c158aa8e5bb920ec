//! User settings.
//!
//! `$HOME/.pr-conventions/settings.json` holds an `env` map used as a
//! fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from `$HOME/.pr-conventions/settings.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable fallbacks.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::settings_path()?)
    }

    /// Loads settings from a specific path; a missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(".pr-conventions").join("settings.json"))
    }

    /// Returns an environment variable, falling back to these settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env_value(key).or_else(|| self.env.get(key).cloned())
    }
}

/// Empty values count as unset, since workflow expressions expand missing
/// secrets to an empty string.
fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// Returns an environment variable with fallback to the settings file.
///
/// The settings file is only read when the variable is unset.
pub fn get_env_var(key: &str) -> Result<String> {
    if let Some(value) = env_value(key) {
        return Ok(value);
    }

    Settings::load()
        .with_context(|| format!("Environment variable not found: {key}"))?
        .get_env_var(key)
        .with_context(|| format!("Environment variable not found: {key}"))
}

/// Returns the first of several environment variables that is set.
pub fn get_env_vars(keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| get_env_var(key).ok())
        .ok_or_else(|| anyhow::anyhow!("None of the environment variables found: {keys:?}"))
}
