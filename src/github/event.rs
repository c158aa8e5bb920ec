//! Runner event payloads (`GITHUB_EVENT_NAME` / `GITHUB_EVENT_PATH`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors reading the event payload.
#[derive(Error, Debug)]
pub enum EventError {
    /// The payload file could not be read.
    #[error("Failed to read event payload {}", .path.display())]
    Read {
        /// Payload path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The payload is not the JSON we expect.
    #[error("Failed to parse event payload")]
    Parse(#[from] serde_json::Error),
}

/// Event that triggered the workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// `pull_request`.
    PullRequest,
    /// `pull_request_target`.
    PullRequestTarget,
    /// `merge_group` (merge queue).
    MergeGroup,
    /// Any other event.
    Other,
}

impl EventKind {
    /// Maps a `GITHUB_EVENT_NAME` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "pull_request" => EventKind::PullRequest,
            "pull_request_target" => EventKind::PullRequestTarget,
            "merge_group" => EventKind::MergeGroup,
            _ => EventKind::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    pull_request: Option<RawPullRequest>,
    merge_group: Option<RawMergeGroup>,
    repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    title: String,
    user: Option<RawUser>,
    #[serde(default)]
    labels: Vec<RawLabel>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawMergeGroup {
    head_commit: Option<RawCommit>,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

/// What the workflow run knows about the pull request, all fields optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    /// Triggering event, when known.
    pub kind: Option<EventKind>,
    /// `owner/name` of the base repository.
    pub repository: Option<String>,
    /// Pull request number.
    pub number: Option<u64>,
    /// Pull request title.
    pub title: Option<String>,
    /// Pull request author login.
    pub author: Option<String>,
    /// Labels on the pull request at event time.
    pub labels: Option<Vec<String>>,
    /// Head commit message of a merge group.
    pub merge_group_message: Option<String>,
}

impl EventContext {
    /// Reads the context from the runner environment.
    ///
    /// Outside of a workflow run (no `GITHUB_EVENT_PATH`) only
    /// `GITHUB_REPOSITORY` is picked up.
    pub fn from_env() -> Result<Self, EventError> {
        Self::from_parts(
            env::var("GITHUB_EVENT_NAME").ok().as_deref(),
            env::var_os("GITHUB_EVENT_PATH").map(PathBuf::from).as_deref(),
            env::var("GITHUB_REPOSITORY").ok(),
        )
    }

    /// Builds the context from an event name, payload path and fallback repository.
    pub fn from_parts(
        event_name: Option<&str>,
        payload_path: Option<&Path>,
        repository: Option<String>,
    ) -> Result<Self, EventError> {
        let kind = event_name.map(EventKind::from_name);
        let mut context = match payload_path {
            Some(path) => Self::from_file(kind.unwrap_or(EventKind::Other), path)?,
            None => Self {
                kind,
                ..Self::default()
            },
        };
        if context.repository.is_none() {
            context.repository = repository.filter(|r| !r.is_empty());
        }
        Ok(context)
    }

    /// Reads and parses a payload file.
    pub fn from_file(kind: EventKind, path: &Path) -> Result<Self, EventError> {
        let content = fs::read_to_string(path).map_err(|source| EventError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_payload(kind, &content)
    }

    /// Parses a payload JSON document.
    pub fn from_payload(kind: EventKind, payload: &str) -> Result<Self, EventError> {
        let raw: RawPayload = serde_json::from_str(payload)?;

        let mut context = Self {
            kind: Some(kind),
            repository: raw.repository.map(|r| r.full_name),
            ..Self::default()
        };

        if let Some(pr) = raw.pull_request {
            context.number = Some(pr.number);
            context.title = Some(pr.title);
            context.author = pr.user.map(|u| u.login);
            context.labels = Some(pr.labels.into_iter().map(|l| l.name).collect());
        }

        if let Some(group) = raw.merge_group {
            context.merge_group_message = group.head_commit.map(|c| c.message);
        }

        debug!(
            kind = ?context.kind,
            repository = ?context.repository,
            number = ?context.number,
            "Loaded event payload"
        );
        Ok(context)
    }

    /// Whether the run was triggered by the merge queue.
    pub fn is_merge_group(&self) -> bool {
        self.kind == Some(EventKind::MergeGroup)
    }
}
