//! Linked-issue job: the pull request must close at least one issue and
//! every issue it closes must still be open.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::find_label;
use crate::data::{CheckOutcome, Finding, Job};
use crate::github::{GitHubApi, IssueState, LinkedIssue, PullRequestRef};

/// Largest page GitHub GraphQL connections accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Rules from the `linked_issues` section of the project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedIssueRules {
    /// Issues requested per GraphQL page (1-100).
    pub page_size: u32,
    /// Authors whose pull requests skip the job (bots, release automation).
    pub exempt_authors: Vec<String>,
    /// Labels that make the job skip.
    pub exempt_labels: Vec<String>,
}

impl Default for LinkedIssueRules {
    fn default() -> Self {
        Self {
            page_size: 25,
            exempt_authors: Vec::new(),
            exempt_labels: Vec::new(),
        }
    }
}

/// Fetches every linked issue, following the GraphQL cursor.
///
/// Returns the reported total alongside the issues that were readable.
pub async fn collect_linked_issues(
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
    page_size: u32,
) -> Result<(u64, Vec<LinkedIssue>)> {
    let first = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut issues = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api
            .closing_issues_page(pr, first, cursor.as_deref())
            .await
            .with_context(|| format!("Failed to query linked issues of {pr}"))?;
        let total_count = page.total_count;
        issues.extend(page.issues);

        match (page.has_next_page, page.end_cursor) {
            (true, Some(next)) => cursor = Some(next),
            (true, None) => {
                warn!(pr = %pr, "GraphQL reported another page without a cursor");
                return Ok((total_count, issues));
            }
            (false, _) => return Ok((total_count, issues)),
        }
    }
}

/// Turns the linked issues into findings.
pub fn evaluate_linked_issues(total_count: u64, issues: &[LinkedIssue]) -> Vec<Finding> {
    if total_count == 0 {
        return vec![Finding::error(
            "missing",
            "pull request does not have any linked issues",
        )];
    }

    let mut findings: Vec<Finding> = issues
        .iter()
        .filter(|issue| issue.state != IssueState::Open)
        .map(|issue| {
            Finding::error(
                "state",
                format!(
                    "linked issue {}#{} is {}: {}",
                    issue.repository, issue.number, issue.state, issue.title
                ),
            )
        })
        .collect();

    // An issue the token cannot read has no verifiable state
    let hidden = total_count.saturating_sub(issues.len() as u64);
    if hidden > 0 {
        findings.push(Finding::error(
            "visibility",
            format!(
                "{hidden} of {total_count} linked issue(s) are not visible to the current token; \
                 their state cannot be checked"
            ),
        ));
    }

    if findings.is_empty() {
        let list = issues
            .iter()
            .map(|issue| format!("{}#{}", issue.repository, issue.number))
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(Finding::info(
            "linked",
            format!("{} open linked issue(s): {list}", issues.len()),
        ));
    }

    findings
}

/// Runs the linked-issue job.
///
/// `author` and `labels` come from the event payload when available. Labels
/// are fetched only when exempt labels are configured and the payload did
/// not carry them.
pub async fn check_linked_issues(
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
    rules: &LinkedIssueRules,
    author: Option<&str>,
    labels: Option<&[String]>,
) -> Result<CheckOutcome> {
    let subject = pr.to_string();

    if let Some(author) = author.filter(|author| find_label(&rules.exempt_authors, author).is_some())
    {
        return Ok(CheckOutcome::skipped(
            Job::LinkedIssues,
            subject,
            format!("author `{author}` is exempt from the linked-issue check"),
        ));
    }

    if !rules.exempt_labels.is_empty() {
        let current = match labels {
            Some(labels) => labels.to_vec(),
            None => api
                .issue_labels(pr)
                .await
                .with_context(|| format!("Failed to list labels of {pr}"))?,
        };
        if let Some(label) = rules
            .exempt_labels
            .iter()
            .find(|exempt| find_label(&current, exempt).is_some())
        {
            return Ok(CheckOutcome::skipped(
                Job::LinkedIssues,
                subject,
                format!("label `{label}` exempts the pull request from the linked-issue check"),
            ));
        }
    }

    let (total_count, issues) = collect_linked_issues(api, pr, rules.page_size).await?;
    info!(pr = %pr, total_count, readable = issues.len(), "Collected linked issues");

    Ok(CheckOutcome::from_findings(
        Job::LinkedIssues,
        subject,
        evaluate_linked_issues(total_count, &issues),
    ))
}
