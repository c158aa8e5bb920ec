//! GraphQL documents and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::client::{IssueState, LinkedIssue, LinkedIssuePage, PullRequestRef};
use super::GitHubError;

/// Issues a pull request will close when merged.
pub const CLOSING_ISSUES_QUERY: &str = r"query ($owner: String!, $repo: String!, $number: Int!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      closingIssuesReferences(first: $first, after: $after) {
        totalCount
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          number
          state
          title
          repository {
            nameWithOwner
          }
        }
      }
    }
  }
}";

/// Request body for the GraphQL endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    /// Query document.
    pub query: &'a str,
    /// Query variables.
    pub variables: Value,
}

/// Response envelope from the GraphQL endpoint.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Query result; may be partial when `errors` is set.
    pub data: Option<T>,
    /// Errors reported alongside (or instead of) the data.
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

/// A single GraphQL error.
#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    /// Error message.
    pub message: String,
    /// GitHub's error classification, e.g. `FORBIDDEN` or `NOT_FOUND`.
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
}

impl GraphQlErrorMessage {
    /// GitHub reports nodes the token may not read as `FORBIDDEN` and
    /// returns them as `null` in the data.
    fn is_forbidden_node(&self) -> bool {
        self.error_type.as_deref() == Some("FORBIDDEN")
    }
}

impl<T> GraphQlResponse<T> {
    /// Returns the data.
    ///
    /// Errors are fatal unless data came back and every error is a
    /// `FORBIDDEN` node; those nodes are `null` and left to the caller.
    pub fn into_data(self) -> Result<T, GitHubError> {
        match self.data {
            Some(data) if self.errors.iter().all(GraphQlErrorMessage::is_forbidden_node) => {
                if !self.errors.is_empty() {
                    warn!(
                        count = self.errors.len(),
                        "GraphQL response has nodes the token cannot read"
                    );
                }
                Ok(data)
            }
            Some(_) => Err(GitHubError::GraphQl(
                self.errors.into_iter().map(|e| e.message).collect(),
            )),
            None if !self.errors.is_empty() => Err(GitHubError::GraphQl(
                self.errors.into_iter().map(|e| e.message).collect(),
            )),
            None => Err(GitHubError::InvalidResponseFormat(
                "response has no data".to_string(),
            )),
        }
    }
}

/// Variables for [`CLOSING_ISSUES_QUERY`].
pub fn closing_issues_variables(pr: &PullRequestRef, first: u32, after: Option<&str>) -> Value {
    json!({
        "owner": pr.owner,
        "repo": pr.repo,
        "number": pr.number,
        "first": first,
        "after": after,
    })
}

/// `data` of [`CLOSING_ISSUES_QUERY`].
#[derive(Debug, Deserialize)]
pub struct ClosingIssuesData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    closing_issues_references: IssueConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueConnection {
    total_count: u64,
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<IssueNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    number: u64,
    state: IssueState,
    title: String,
    repository: IssueRepository,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRepository {
    name_with_owner: String,
}

impl ClosingIssuesData {
    /// Flattens the nested response into a page.
    pub fn into_page(self, pr: &PullRequestRef) -> Result<LinkedIssuePage, GitHubError> {
        let repository = self.repository.ok_or_else(|| {
            GitHubError::InvalidResponseFormat(format!(
                "repository {}/{} not found",
                pr.owner, pr.repo
            ))
        })?;
        let pull_request = repository.pull_request.ok_or_else(|| {
            GitHubError::InvalidResponseFormat(format!("pull request {pr} not found"))
        })?;
        let connection = pull_request.closing_issues_references;

        // Nodes can be null when the token cannot see the issue's repository
        let issues = connection
            .nodes
            .into_iter()
            .flatten()
            .map(|node| LinkedIssue {
                number: node.number,
                state: node.state,
                title: node.title,
                repository: node.repository.name_with_owner,
            })
            .collect();

        Ok(LinkedIssuePage {
            total_count: connection.total_count,
            issues,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}
