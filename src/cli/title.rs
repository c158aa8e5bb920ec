//! Title commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::context::RunContext;
use super::output::emit_report;
use super::GlobalArgs;
use crate::checks::{check_pull_request_title, check_title, TitleSource};
use crate::conventional::TitleRules;
use crate::data::{CheckOutcome, CheckReport};
use crate::git::GitRepository;
use crate::github::HttpGitHubClient;

/// Title operations.
#[derive(Parser)]
pub struct TitleCommand {
    /// Title subcommand to execute.
    #[command(subcommand)]
    pub command: TitleSubcommands,
}

/// Title subcommands.
#[derive(Subcommand)]
pub enum TitleSubcommands {
    /// Verifies a title or commit message against the conventional-commit format.
    Verify(VerifyCommand),
}

/// Verify command options.
#[derive(Parser)]
pub struct VerifyCommand {
    /// Title to verify. Defaults to the merge group commit message or the
    /// pull request title, fetched from GitHub when `--repo`/`--pr` select a
    /// pull request other than the event's.
    #[arg(value_name = "TITLE")]
    pub title: Option<String>,

    /// Verifies the full message of a local commit instead.
    #[arg(long, value_name = "REV", conflicts_with = "title")]
    pub from_commit: Option<String>,
}

impl TitleCommand {
    /// Executes the title command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self.command {
            TitleSubcommands::Verify(verify_cmd) => verify_cmd.execute(global).await,
        }
    }
}

impl VerifyCommand {
    /// Executes the verify command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        let ctx = RunContext::load(global)?;
        let local = verify_title(
            self.title.as_deref(),
            self.from_commit.as_deref(),
            ctx.title(global),
            &ctx.config.title,
        )?;

        let outcome = match local {
            Some(outcome) => outcome,
            None => {
                let pr = ctx.pull_request(global).context(
                    "No title to verify; pass TITLE or --from-commit REV, or run on a pull request event",
                )?;
                let client = HttpGitHubClient::from_env()?;
                check_pull_request_title(&client, &pr, &ctx.config.title).await?
            }
        };

        emit_report(&CheckReport::new(vec![outcome]), global)
    }
}

/// Verifies the first text available locally: an explicit title, a local
/// commit, then the text carried by the workflow event.
///
/// Returns `None` when the title has to be fetched from GitHub.
pub fn verify_title(
    title: Option<&str>,
    from_commit: Option<&str>,
    event_title: Option<(&str, TitleSource)>,
    rules: &TitleRules,
) -> Result<Option<CheckOutcome>> {
    if let Some(title) = title {
        return Ok(Some(check_title(title, TitleSource::PullRequestTitle, rules)));
    }

    if let Some(rev) = from_commit {
        let message = GitRepository::open()?.commit_message(rev)?;
        return Ok(Some(check_title(&message, TitleSource::CommitMessage, rules)));
    }

    Ok(event_title.map(|(text, source)| check_title(text, source, rules)))
}
