//! GitHub API access and runner event payloads.

pub mod client;
pub mod error;
pub mod event;
pub mod graphql;
pub mod http;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::{
    ApiFuture, ChangedFile, GitHubApi, IssueState, LinkedIssue, LinkedIssuePage, PullRequestRef,
};
pub use error::GitHubError;
pub use event::{EventContext, EventError, EventKind};
pub use http::HttpGitHubClient;
