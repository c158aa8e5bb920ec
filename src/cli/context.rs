//! Resolves the pull request a command works on from flags and the runner environment.

use anyhow::{Context, Result};

use super::GlobalArgs;
use crate::checks::TitleSource;
use crate::config::ProjectConfig;
use crate::data::{CheckOutcome, Job};
use crate::github::{EventContext, PullRequestRef};

/// Everything a job command needs before it starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Effective project config.
    pub config: ProjectConfig,
    /// Workflow event, possibly empty outside of Actions.
    pub event: EventContext,
}

impl RunContext {
    /// Loads the project config and the workflow event.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config = ProjectConfig::load(global.config.as_deref())?;
        let event = EventContext::from_env().context("Failed to read the workflow event")?;
        Ok(Self { config, event })
    }

    /// The pull request to check. Flags win over the event payload.
    pub fn pull_request(&self, global: &GlobalArgs) -> Result<PullRequestRef> {
        resolve_pull_request(global, &self.event)
    }

    /// Author login from the event, when it describes the same pull request.
    pub fn author(&self, global: &GlobalArgs) -> Option<&str> {
        event_matches(global, &self.event)
            .then_some(self.event.author.as_deref())
            .flatten()
    }

    /// Labels from the event, when it describes the same pull request.
    pub fn labels(&self, global: &GlobalArgs) -> Option<&[String]> {
        event_matches(global, &self.event)
            .then_some(self.event.labels.as_deref())
            .flatten()
    }

    /// Text the title job verifies without calling GitHub.
    ///
    /// Merge groups give their head commit message. Pull request events give
    /// their title, but only when the flags select the same pull request;
    /// otherwise the caller has to fetch it.
    pub fn title(&self, global: &GlobalArgs) -> Option<(&str, TitleSource)> {
        if self.event.is_merge_group() {
            return self
                .event
                .merge_group_message
                .as_deref()
                .map(|message| (message, TitleSource::CommitMessage));
        }
        event_matches(global, &self.event)
            .then_some(self.event.title.as_deref())
            .flatten()
            .map(|title| (title, TitleSource::PullRequestTitle))
    }

    /// Skipped outcome for jobs that do not run in the merge queue.
    pub fn merge_group_skip(&self, job: Job) -> Option<CheckOutcome> {
        if !self.event.is_merge_group() {
            return None;
        }
        let reason = match job {
            Job::Title => return None,
            Job::LinkedIssues => {
                "linked issues are checked on the pull request, not in the merge queue"
            }
            Job::Labels => "labels are managed on the pull request, not in the merge queue",
        };
        Some(CheckOutcome::skipped(job, "merge group", reason))
    }
}

/// Combines `--repo`/`--pr` with the event payload and `GITHUB_REPOSITORY`.
pub fn resolve_pull_request(global: &GlobalArgs, event: &EventContext) -> Result<PullRequestRef> {
    let repository = global
        .repo
        .as_deref()
        .or(event.repository.as_deref())
        .context("No repository given; pass --repo OWNER/NAME or set GITHUB_REPOSITORY")?;
    let number = global
        .pr
        .or(event.number)
        .context("No pull request number given; pass --pr N or run on a pull_request event")?;

    PullRequestRef::from_repository(repository, number)
}

/// Whether payload details (author, labels) belong to the pull request the flags select.
fn event_matches(global: &GlobalArgs, event: &EventContext) -> bool {
    let same_number = global.pr.is_none() || global.pr == event.number;
    let same_repo = match (&global.repo, &event.repository) {
        (Some(flag), Some(payload)) => flag.eq_ignore_ascii_case(payload),
        (Some(_), None) => false,
        (None, _) => true,
    };
    same_number && same_repo
}
