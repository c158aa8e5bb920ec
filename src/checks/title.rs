//! Title job: conventional-commit verification of a PR title or commit message.

use anyhow::{Context, Result};
use tracing::debug;

use crate::conventional::{parse_header, parse_message, verify, TitleRules};
use crate::data::{CheckOutcome, Finding, Job};
use crate::github::{GitHubApi, PullRequestRef};

/// What kind of text is being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// A single-line pull request title.
    PullRequestTitle,
    /// A full commit message (merge queue or local commit).
    CommitMessage,
}

/// Verifies a title or commit message against the conventional-commit
/// format and the configured rules.
///
/// Surrounding whitespace is ignored. The outcome subject is the header line.
pub fn check_title(text: &str, source: TitleSource, rules: &TitleRules) -> CheckOutcome {
    let text = text.trim();
    let header = text.lines().next().unwrap_or_default();

    let parsed = match source {
        TitleSource::PullRequestTitle => parse_header(text),
        TitleSource::CommitMessage => parse_message(text),
    };

    let findings = match parsed {
        Ok(commit) => {
            debug!(
                commit_type = %commit.commit_type,
                scope = ?commit.scope,
                breaking = commit.breaking,
                "Parsed conventional commit"
            );
            verify(&commit, header, rules)
        }
        Err(err) => vec![Finding::error("format", err.to_string())],
    };

    let subject = if header.is_empty() { "<empty>" } else { header };
    CheckOutcome::from_findings(Job::Title, subject, findings)
}

/// Fetches the pull request title from GitHub and verifies it.
pub async fn check_pull_request_title(
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
    rules: &TitleRules,
) -> Result<CheckOutcome> {
    let title = api
        .pull_request_title(pr)
        .await
        .with_context(|| format!("Failed to fetch the title of {pr}"))?;
    Ok(check_title(&title, TitleSource::PullRequestTitle, rules))
}
