//! Shared test utilities for code written against [`GitHubApi`].

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;

use super::client::{
    ApiFuture, ChangedFile, GitHubApi, IssueState, LinkedIssue, LinkedIssuePage, PullRequestRef,
};

/// A call made against [`MockGitHub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Title,
    ClosingIssues { first: u32, after: Option<String> },
    FilesPage { page: u32, per_page: u32 },
    IssueLabels,
    AddLabels(Vec<String>),
    RemoveLabel(String),
}

/// Mock GitHub API with pre-programmed pages.
///
/// Issue pages are returned in FIFO order and an exhausted queue is an
/// error. File pages are also FIFO, but an exhausted queue returns an
/// empty page, which is how GitHub signals the end of the list. Label
/// mutations are applied to an in-memory label set. Without a title the
/// title lookup fails.
pub(crate) struct MockGitHub {
    issue_pages: Mutex<VecDeque<Result<LinkedIssuePage>>>,
    file_pages: Mutex<VecDeque<Result<Vec<ChangedFile>>>>,
    labels: Mutex<Vec<String>>,
    title: Option<String>,
    fail_mutations: bool,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockGitHub {
    pub(crate) fn new() -> Self {
        Self {
            issue_pages: Mutex::new(VecDeque::new()),
            file_pages: Mutex::new(VecDeque::new()),
            labels: Mutex::new(Vec::new()),
            title: None,
            fail_mutations: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_issue_pages(self, pages: Vec<Result<LinkedIssuePage>>) -> Self {
        *self.issue_pages.lock().unwrap() = pages.into();
        self
    }

    pub(crate) fn with_file_pages(self, pages: Vec<Result<Vec<ChangedFile>>>) -> Self {
        *self.file_pages.lock().unwrap() = pages.into();
        self
    }

    pub(crate) fn with_labels(self, labels: &[&str]) -> Self {
        *self.labels.lock().unwrap() = labels.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub(crate) fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub(crate) fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Builds a single-page response.
pub(crate) fn issue_page(issues: Vec<LinkedIssue>) -> LinkedIssuePage {
    LinkedIssuePage {
        total_count: issues.len() as u64,
        issues,
        has_next_page: false,
        end_cursor: None,
    }
}

pub(crate) fn issue(number: u64, state: IssueState) -> LinkedIssue {
    LinkedIssue {
        number,
        state,
        title: format!("Issue {number}"),
        repository: "juspay/hyperswitch".to_string(),
    }
}

pub(crate) fn changed(filename: &str) -> ChangedFile {
    ChangedFile {
        filename: filename.to_string(),
        status: "modified".to_string(),
        previous_filename: None,
    }
}

pub(crate) fn pr() -> PullRequestRef {
    PullRequestRef::new("juspay", "hyperswitch", 42)
}

impl GitHubApi for MockGitHub {
    fn pull_request_title<'a>(&'a self, _pr: &'a PullRequestRef) -> ApiFuture<'a, String> {
        self.record(ApiCall::Title);
        let title = self.title.clone();
        Box::pin(async move { title.ok_or_else(|| anyhow::anyhow!("HTTP 404: Not Found")) })
    }

    fn closing_issues_page<'a>(
        &'a self,
        _pr: &'a PullRequestRef,
        first: u32,
        after: Option<&'a str>,
    ) -> ApiFuture<'a, LinkedIssuePage> {
        self.record(ApiCall::ClosingIssues {
            first,
            after: after.map(String::from),
        });
        let next = self.issue_pages.lock().unwrap().pop_front();
        Box::pin(async move {
            next.unwrap_or_else(|| Err(anyhow::anyhow!("no more mock issue pages")))
        })
    }

    fn pull_request_files_page<'a>(
        &'a self,
        _pr: &'a PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> ApiFuture<'a, Vec<ChangedFile>> {
        self.record(ApiCall::FilesPage { page, per_page });
        let next = self.file_pages.lock().unwrap().pop_front();
        Box::pin(async move { next.unwrap_or_else(|| Ok(Vec::new())) })
    }

    fn issue_labels<'a>(&'a self, _pr: &'a PullRequestRef) -> ApiFuture<'a, Vec<String>> {
        self.record(ApiCall::IssueLabels);
        let labels = self.labels();
        Box::pin(async move { Ok(labels) })
    }

    fn add_labels<'a>(
        &'a self,
        _pr: &'a PullRequestRef,
        labels: &'a [String],
    ) -> ApiFuture<'a, ()> {
        self.record(ApiCall::AddLabels(labels.to_vec()));
        Box::pin(async move {
            if self.fail_mutations {
                anyhow::bail!("GitHub API request failed: HTTP 403: forbidden");
            }
            self.labels.lock().unwrap().extend(labels.iter().cloned());
            Ok(())
        })
    }

    fn remove_label<'a>(&'a self, _pr: &'a PullRequestRef, label: &'a str) -> ApiFuture<'a, ()> {
        self.record(ApiCall::RemoveLabel(label.to_string()));
        Box::pin(async move {
            if self.fail_mutations {
                anyhow::bail!("GitHub API request failed: HTTP 403: forbidden");
            }
            self.labels.lock().unwrap().retain(|l| l != label);
            Ok(())
        })
    }
}
