//! GitHub API trait and the transient entities it returns.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Boxed future returned by [`GitHubApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Identifies a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl PullRequestRef {
    /// Creates a reference from its parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Creates a reference from an `owner/name` repository string.
    pub fn from_repository(full_name: &str, number: u64) -> Result<Self> {
        let (owner, repo) = split_repository(full_name)?;
        Ok(Self::new(owner, repo, number))
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Splits `owner/name` into its two parts.
pub fn split_repository(full_name: &str) -> Result<(&str, &str)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => bail!("Invalid repository '{full_name}'. Expected owner/name"),
    }
}

/// State of an issue as reported by GraphQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    /// Issue is open.
    Open,
    /// Issue is closed.
    Closed,
    /// Any state this tool does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
            IssueState::Unknown => write!(f, "unknown"),
        }
    }
}

/// An issue that merging the pull request will close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedIssue {
    /// Issue number.
    pub number: u64,
    /// Current state.
    pub state: IssueState,
    /// Issue title.
    pub title: String,
    /// `owner/name` of the repository holding the issue.
    pub repository: String,
}

/// One page of `closingIssuesReferences`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkedIssuePage {
    /// Total number of linked issues across all pages.
    pub total_count: u64,
    /// Issues on this page.
    pub issues: Vec<LinkedIssue>,
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}

/// A file touched by a pull request, as listed by the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root.
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, ...
    pub status: String,
    /// Original path for renamed files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
}

impl ChangedFile {
    /// Every path this change touches: the file and, for renames, its old path.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.filename.as_str()).chain(self.previous_filename.as_deref())
    }
}

/// Operations the pull request jobs need from GitHub.
pub trait GitHubApi: Send + Sync {
    /// Fetches one page of issues the pull request will close.
    fn closing_issues_page<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        first: u32,
        after: Option<&'a str>,
    ) -> ApiFuture<'a, LinkedIssuePage>;

    /// Fetches the current title of the pull request.
    fn pull_request_title<'a>(&'a self, pr: &'a PullRequestRef) -> ApiFuture<'a, String>;

    /// Fetches one page (1-based) of changed files.
    fn pull_request_files_page<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> ApiFuture<'a, Vec<ChangedFile>>;

    /// Lists the label names currently on the pull request.
    fn issue_labels<'a>(&'a self, pr: &'a PullRequestRef) -> ApiFuture<'a, Vec<String>>;

    /// Adds labels to the pull request.
    fn add_labels<'a>(&'a self, pr: &'a PullRequestRef, labels: &'a [String]) -> ApiFuture<'a, ()>;

    /// Removes one label from the pull request.
    fn remove_label<'a>(&'a self, pr: &'a PullRequestRef, label: &'a str) -> ApiFuture<'a, ()>;
}
