//! Linked-issue commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::context::RunContext;
use super::output::emit_report;
use super::GlobalArgs;
use crate::checks::check_linked_issues;
use crate::data::{CheckReport, Job};
use crate::github::HttpGitHubClient;

/// Linked-issue operations.
#[derive(Parser)]
pub struct IssuesCommand {
    /// Issues subcommand to execute.
    #[command(subcommand)]
    pub command: IssuesSubcommands,
}

/// Linked-issue subcommands.
#[derive(Subcommand)]
pub enum IssuesSubcommands {
    /// Fails unless the pull request closes at least one issue and all of them are open.
    Check(CheckCommand),
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {}

impl IssuesCommand {
    /// Executes the issues command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self.command {
            IssuesSubcommands::Check(check_cmd) => check_cmd.execute(global).await,
        }
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        let ctx = RunContext::load(global)?;

        let outcome = match ctx.merge_group_skip(Job::LinkedIssues) {
            Some(skipped) => skipped,
            None => {
                let pr = ctx.pull_request(global)?;
                let client = HttpGitHubClient::from_env()?;
                check_linked_issues(
                    &client,
                    &pr,
                    &ctx.config.linked_issues,
                    ctx.author(global),
                    ctx.labels(global),
                )
                .await?
            }
        };

        emit_report(&CheckReport::new(vec![outcome]), global)
    }
}
