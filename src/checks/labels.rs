//! Label job: adds and removes labels according to the changed-file list.

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::find_label;
use crate::data::{CheckOutcome, Finding, Job};
use crate::github::{ChangedFile, GitHubApi, PullRequestRef};

/// Files requested per REST page.
pub const FILES_PER_PAGE: u32 = 100;

/// GitHub stops listing pull request files after 3000 entries.
pub const MAX_FILE_PAGES: u32 = 30;

/// A label and the paths that attract it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    /// Label name as it exists in the repository.
    pub name: String,
    /// Regular expressions matched against each changed path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    /// Glob patterns matched against each changed path. `*` does not cross `/`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub globs: Vec<String>,
}

impl LabelRule {
    fn regex(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            patterns: vec![pattern.to_string()],
            globs: Vec::new(),
        }
    }
}

/// The labels applied when the project config has no `labels` section.
pub fn default_label_rules() -> Vec<LabelRule> {
    vec![
        LabelRule::regex(
            "M-database-changes",
            "^(migrations|v2_migrations|v2_compatible_migrations)/",
        ),
        LabelRule::regex(
            "M-api-contract-changes",
            "^(crates/api_models/|api-reference/)",
        ),
    ]
}

/// A [`LabelRule`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledLabelRule {
    name: String,
    patterns: Vec<Regex>,
    globs: GlobSet,
}

impl CompiledLabelRule {
    /// Compiles one rule. A rule without any pattern is rejected.
    pub fn new(rule: &LabelRule) -> Result<Self> {
        if rule.patterns.is_empty() && rule.globs.is_empty() {
            bail!("Label rule `{}` has no patterns or globs", rule.name);
        }

        let patterns = rule
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| {
                    format!("Invalid pattern `{pattern}` for label `{}`", rule.name)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut builder = GlobSetBuilder::new();
        for glob in &rule.globs {
            let compiled = GlobBuilder::new(glob)
                .literal_separator(true)
                .build()
                .with_context(|| format!("Invalid glob `{glob}` for label `{}`", rule.name))?;
            builder.add(compiled);
        }
        let globs = builder
            .build()
            .with_context(|| format!("Failed to build globs for label `{}`", rule.name))?;

        Ok(Self {
            name: rule.name.clone(),
            patterns,
            globs,
        })
    }

    /// The label this rule controls.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a single path matches.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path)) || self.globs.is_match(path)
    }

    /// Whether any changed file matches, including the old path of renames.
    pub fn matches_any(&self, files: &[ChangedFile]) -> bool {
        files
            .iter()
            .flat_map(ChangedFile::paths)
            .any(|path| self.matches(path))
    }
}

/// Compiles every rule in configuration order.
pub fn compile_rules(rules: &[LabelRule]) -> Result<Vec<CompiledLabelRule>> {
    rules.iter().map(CompiledLabelRule::new).collect()
}

/// A single label mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "label", rename_all = "lowercase")]
pub enum LabelChange {
    /// Apply the label.
    Add(String),
    /// Take the label off.
    Remove(String),
}

/// Returns each label name once with whether any of its rules matched.
///
/// Rules that share a name are merged, so the label is wanted when any of
/// them matches. The first occurrence decides the position.
pub fn matched_labels(files: &[ChangedFile], rules: &[CompiledLabelRule]) -> Vec<(String, bool)> {
    let mut labels: Vec<(String, bool)> = Vec::new();
    for rule in rules {
        let matched = rule.matches_any(files);
        match labels
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(rule.name()))
        {
            Some((_, wanted)) => *wanted |= matched,
            None => labels.push((rule.name().to_string(), matched)),
        }
    }
    labels
}

/// Computes the changes that bring `current` in line with the changed files.
///
/// Removals use the casing of the label already on the pull request.
pub fn plan_label_changes(
    files: &[ChangedFile],
    current: &[String],
    rules: &[CompiledLabelRule],
) -> Vec<LabelChange> {
    matched_labels(files, rules)
        .into_iter()
        .filter_map(|(name, matched)| match (matched, find_label(current, &name)) {
            (true, None) => Some(LabelChange::Add(name)),
            (false, Some(existing)) => Some(LabelChange::Remove(existing.clone())),
            _ => None,
        })
        .collect()
}

/// Lists every file changed by the pull request.
///
/// Stops on the first short page or after [`MAX_FILE_PAGES`] pages.
pub async fn list_changed_files(
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
) -> Result<Vec<ChangedFile>> {
    let mut files = Vec::new();
    for page in 1..=MAX_FILE_PAGES {
        let batch = api
            .pull_request_files_page(pr, page, FILES_PER_PAGE)
            .await
            .with_context(|| format!("Failed to list changed files of {pr} (page {page})"))?;
        let count = batch.len();
        files.extend(batch);

        if count < FILES_PER_PAGE as usize {
            return Ok(files);
        }
    }

    warn!(
        pr = %pr,
        files = files.len(),
        "Changed-file listing reached the GitHub limit; later files are not considered"
    );
    Ok(files)
}

/// Runs the label job.
///
/// `current_labels` comes from the event payload when available; otherwise
/// the labels are read from the API. With `dry_run` the plan is reported
/// and nothing is changed.
pub async fn sync_labels(
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
    rules: &[CompiledLabelRule],
    current_labels: Option<Vec<String>>,
    dry_run: bool,
) -> Result<CheckOutcome> {
    let files = list_changed_files(api, pr).await?;
    debug!(pr = %pr, files = files.len(), "Listed changed files");

    let current = match current_labels {
        Some(labels) => labels,
        None => api
            .issue_labels(pr)
            .await
            .with_context(|| format!("Failed to list labels of {pr}"))?,
    };

    let changes = plan_label_changes(&files, &current, rules);
    let subject = pr.to_string();

    if changes.is_empty() {
        return Ok(CheckOutcome::from_findings(
            Job::Labels,
            subject,
            vec![Finding::info("labels", "labels already up to date")],
        ));
    }

    if dry_run {
        let findings = changes
            .iter()
            .map(|change| match change {
                LabelChange::Add(name) => Finding::info("add", format!("would add label `{name}`")),
                LabelChange::Remove(name) => {
                    Finding::info("remove", format!("would remove label `{name}`"))
                }
            })
            .collect();
        return Ok(CheckOutcome::from_findings(Job::Labels, subject, findings));
    }

    let additions: Vec<String> = changes
        .iter()
        .filter_map(|change| match change {
            LabelChange::Add(name) => Some(name.clone()),
            LabelChange::Remove(_) => None,
        })
        .collect();

    let mut findings = Vec::new();
    if !additions.is_empty() {
        api.add_labels(pr, &additions)
            .await
            .with_context(|| format!("Failed to add labels to {pr}"))?;
        info!(pr = %pr, labels = ?additions, "Added labels");
        findings.extend(
            additions
                .iter()
                .map(|name| Finding::info("add", format!("added label `{name}`"))),
        );
    }

    for change in &changes {
        if let LabelChange::Remove(name) = change {
            api.remove_label(pr, name)
                .await
                .with_context(|| format!("Failed to remove label `{name}` from {pr}"))?;
            info!(pr = %pr, label = %name, "Removed label");
            findings.push(Finding::info("remove", format!("removed label `{name}`")));
        }
    }

    Ok(CheckOutcome::from_findings(Job::Labels, subject, findings))
}
