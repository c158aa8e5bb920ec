//! `reqwest`-backed implementation of [`GitHubApi`].

use anyhow::{anyhow, Context, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::client::{ApiFuture, ChangedFile, GitHubApi, LinkedIssuePage, PullRequestRef};
use super::graphql::{
    closing_issues_variables, ClosingIssuesData, GraphQlRequest, GraphQlResponse,
    CLOSING_ISSUES_QUERY,
};
use super::GitHubError;
use crate::utils::settings::{get_env_var, get_env_vars};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pr-conventions/", env!("CARGO_PKG_VERSION"));
const LABELS_PER_PAGE: u32 = 100;
const MAX_LABEL_PAGES: u32 = 10;

#[derive(Deserialize)]
struct LabelNode {
    name: String,
}

#[derive(Deserialize)]
struct PullRequestNode {
    title: String,
}

/// GitHub client speaking REST and GraphQL over HTTPS.
pub struct HttpGitHubClient {
    /// HTTP client for API requests
    client: Client,
    /// Bearer token
    token: String,
    /// REST base URL without trailing slash
    api_url: String,
    /// Full GraphQL endpoint URL
    graphql_url: String,
}

impl HttpGitHubClient {
    /// Creates a client. The GraphQL endpoint defaults to `{api_url}/graphql`.
    pub fn new(token: String, api_url: &str, graphql_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        let api_url = api_url.trim_end_matches('/').to_string();
        let graphql_url = graphql_url.unwrap_or_else(|| format!("{api_url}/graphql"));

        Ok(Self {
            client,
            token,
            api_url,
            graphql_url,
        })
    }

    /// Creates a client from `GITHUB_TOKEN`/`GH_TOKEN`, `GITHUB_API_URL` and
    /// `GITHUB_GRAPHQL_URL`, falling back to the settings file.
    pub fn from_env() -> Result<Self> {
        let token =
            get_env_vars(&["GITHUB_TOKEN", "GH_TOKEN"]).map_err(|_| GitHubError::TokenNotFound)?;
        let api_url = get_env_var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let graphql_url = get_env_var("GITHUB_GRAPHQL_URL").ok();

        Self::new(token, &api_url, graphql_url)
    }

    /// Builds a REST URL from path segments, percent-encoding each one.
    fn rest_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", self.api_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("GitHub API URL cannot be a base: {}", self.api_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::ApiRequestFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()).into())
    }

    async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let url = Url::parse(&self.graphql_url)
            .with_context(|| format!("Invalid GitHub GraphQL URL: {}", self.graphql_url))?;
        debug!(url = %url, variables = %variables, "Sending GraphQL query");

        let body = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;

        Ok(response.into_data()?)
    }
}

impl GitHubApi for HttpGitHubClient {
    fn closing_issues_page<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        first: u32,
        after: Option<&'a str>,
    ) -> ApiFuture<'a, LinkedIssuePage> {
        Box::pin(async move {
            let data: ClosingIssuesData = self
                .graphql(
                    CLOSING_ISSUES_QUERY,
                    closing_issues_variables(pr, first, after),
                )
                .await?;
            let page = data.into_page(pr)?;

            debug!(
                pr = %pr,
                total_count = page.total_count,
                page_len = page.issues.len(),
                has_next_page = page.has_next_page,
                "Received closing issue references"
            );
            Ok(page)
        })
    }

    fn pull_request_title<'a>(&'a self, pr: &'a PullRequestRef) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let number = pr.number.to_string();
            let url = self.rest_url(&["repos", &pr.owner, &pr.repo, "pulls", &number])?;

            debug!(url = %url, "Fetching pull request");
            let pull: PullRequestNode = self.send_json(self.request(Method::GET, url)).await?;
            Ok(pull.title)
        })
    }

    fn pull_request_files_page<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> ApiFuture<'a, Vec<ChangedFile>> {
        Box::pin(async move {
            let number = pr.number.to_string();
            let mut url = self.rest_url(&[
                "repos",
                &pr.owner,
                &pr.repo,
                "pulls",
                &number,
                "files",
            ])?;
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string())
                .append_pair("page", &page.to_string());

            debug!(url = %url, "Listing pull request files");
            self.send_json(self.request(Method::GET, url)).await
        })
    }

    fn issue_labels<'a>(&'a self, pr: &'a PullRequestRef) -> ApiFuture<'a, Vec<String>> {
        Box::pin(async move {
            let number = pr.number.to_string();
            let mut names = Vec::new();

            for page in 1..=MAX_LABEL_PAGES {
                let mut url =
                    self.rest_url(&["repos", &pr.owner, &pr.repo, "issues", &number, "labels"])?;
                url.query_pairs_mut()
                    .append_pair("per_page", &LABELS_PER_PAGE.to_string())
                    .append_pair("page", &page.to_string());

                debug!(url = %url, "Listing pull request labels");
                let labels: Vec<LabelNode> =
                    self.send_json(self.request(Method::GET, url)).await?;
                let count = labels.len();
                names.extend(labels.into_iter().map(|label| label.name));

                if count < LABELS_PER_PAGE as usize {
                    return Ok(names);
                }
            }

            warn!(pr = %pr, labels = names.len(), "Stopped listing labels at the page limit");
            Ok(names)
        })
    }

    fn add_labels<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        labels: &'a [String],
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let number = pr.number.to_string();
            let url =
                self.rest_url(&["repos", &pr.owner, &pr.repo, "issues", &number, "labels"])?;

            info!(pr = %pr, labels = ?labels, "Adding labels");
            self.send(
                self.request(Method::POST, url)
                    .json(&json!({ "labels": labels })),
            )
            .await?;
            Ok(())
        })
    }

    fn remove_label<'a>(&'a self, pr: &'a PullRequestRef, label: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let number = pr.number.to_string();
            let url = self.rest_url(&[
                "repos", &pr.owner, &pr.repo, "issues", &number, "labels", label,
            ])?;

            info!(pr = %pr, label, "Removing label");
            let response = self
                .request(Method::DELETE, url)
                .send()
                .await
                .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

            match response.status() {
                status if status.is_success() => Ok(()),
                StatusCode::NOT_FOUND => {
                    warn!(pr = %pr, label, "Label was already absent");
                    Ok(())
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    Err(GitHubError::ApiRequestFailed {
                        status: status.as_u16(),
                        body,
                    }
                    .into())
                }
            }
        })
    }
}
