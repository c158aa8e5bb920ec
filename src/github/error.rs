//! GitHub-specific error handling.

use thiserror::Error;

/// GitHub API errors.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// No token in the environment or settings file.
    #[error("GitHub token not found. Set GITHUB_TOKEN or GH_TOKEN environment variable")]
    TokenNotFound,

    /// The API answered with a non-success status.
    #[error("GitHub API request failed: HTTP {status}: {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The GraphQL endpoint returned an `errors` array.
    #[error("GitHub GraphQL query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response body did not have the expected shape.
    #[error("Invalid response format from GitHub API: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}
