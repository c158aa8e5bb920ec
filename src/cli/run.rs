//! Runs every job for one event.

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join3;
use tracing::info;

use super::context::RunContext;
use super::output::{emit_report, outcome_or_failure};
use super::GlobalArgs;
use crate::checks::{
    check_linked_issues, check_pull_request_title, check_title, compile_rules, sync_labels,
    CompiledLabelRule,
};
use crate::data::{CheckOutcome, CheckReport, Job};
use crate::github::{GitHubApi, HttpGitHubClient, PullRequestRef};

/// Run command options.
#[derive(Parser)]
pub struct RunCommand {
    /// Reports label changes without applying them.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    /// Executes the run command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        let ctx = RunContext::load(global)?;
        let rules = compile_rules(&ctx.config.labels)?;

        let outcomes = if ctx.event.is_merge_group() {
            info!("Merge group event, only the title job runs");
            run_merge_group_jobs(&ctx, global)
        } else {
            let pr = ctx.pull_request(global)?;
            let client = HttpGitHubClient::from_env()?;
            run_pull_request_jobs(&ctx, global, &client, &pr, &rules, self.dry_run).await
        };

        emit_report(&CheckReport::new(outcomes), global)
    }
}

/// Merge queue: the head commit message is verified, the other jobs are skipped.
pub fn run_merge_group_jobs(ctx: &RunContext, global: &GlobalArgs) -> Vec<CheckOutcome> {
    let title = ctx
        .title(global)
        .map(|(text, source)| check_title(text, source, &ctx.config.title))
        .context("The merge group event has no head commit message");

    let mut outcomes = vec![outcome_or_failure(Job::Title, "merge group", title)];
    outcomes.extend(
        [Job::LinkedIssues, Job::Labels]
            .into_iter()
            .filter_map(|job| ctx.merge_group_skip(job)),
    );
    outcomes
}

/// Runs the three pull request jobs concurrently.
///
/// A job that fails to run becomes a failed outcome so the others still report.
pub async fn run_pull_request_jobs(
    ctx: &RunContext,
    global: &GlobalArgs,
    api: &dyn GitHubApi,
    pr: &PullRequestRef,
    rules: &[CompiledLabelRule],
    dry_run: bool,
) -> Vec<CheckOutcome> {
    let subject = pr.to_string();

    let title = async {
        match ctx.title(global) {
            Some((text, source)) => Ok(check_title(text, source, &ctx.config.title)),
            None => check_pull_request_title(api, pr, &ctx.config.title).await,
        }
    };
    let issues = check_linked_issues(
        api,
        pr,
        &ctx.config.linked_issues,
        ctx.author(global),
        ctx.labels(global),
    );
    let labels = sync_labels(
        api,
        pr,
        rules,
        ctx.labels(global).map(<[String]>::to_vec),
        dry_run,
    );

    let (title, issues, labels) = join3(title, issues, labels).await;
    vec![
        outcome_or_failure(Job::Title, &subject, title),
        outcome_or_failure(Job::LinkedIssues, &subject, issues),
        outcome_or_failure(Job::Labels, &subject, labels),
    ]
}
