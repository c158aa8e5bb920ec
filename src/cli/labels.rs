//! Label commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::context::RunContext;
use super::output::{emit_report, print_serialized};
use super::GlobalArgs;
use crate::checks::{compile_rules, matched_labels, sync_labels};
use crate::config::ProjectConfig;
use crate::data::{CheckReport, Job};
use crate::github::{ChangedFile, HttpGitHubClient};

/// Label operations.
#[derive(Parser)]
pub struct LabelsCommand {
    /// Labels subcommand to execute.
    #[command(subcommand)]
    pub command: LabelsSubcommands,
}

/// Label subcommands.
#[derive(Subcommand)]
pub enum LabelsSubcommands {
    /// Adds and removes labels to match the pull request's changed files.
    Sync(SyncCommand),
    /// Prints the labels the given paths would receive. Makes no API calls.
    Match(MatchCommand),
}

/// Sync command options.
#[derive(Parser)]
pub struct SyncCommand {
    /// Reports the planned changes without applying them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Match command options.
#[derive(Parser)]
pub struct MatchCommand {
    /// Repository-relative paths, as GitHub reports them.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,
}

impl LabelsCommand {
    /// Executes the labels command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self.command {
            LabelsSubcommands::Sync(sync_cmd) => sync_cmd.execute(global).await,
            LabelsSubcommands::Match(match_cmd) => match_cmd.execute(global),
        }
    }
}

impl SyncCommand {
    /// Executes the sync command.
    pub async fn execute(self, global: &GlobalArgs) -> Result<()> {
        let ctx = RunContext::load(global)?;
        let rules = compile_rules(&ctx.config.labels)?;

        let outcome = match ctx.merge_group_skip(Job::Labels) {
            Some(skipped) => skipped,
            None => {
                let pr = ctx.pull_request(global)?;
                let client = HttpGitHubClient::from_env()?;
                let labels = ctx.labels(global).map(<[String]>::to_vec);
                sync_labels(&client, &pr, &rules, labels, self.dry_run).await?
            }
        };

        emit_report(&CheckReport::new(vec![outcome]), global)
    }
}

impl MatchCommand {
    /// Executes the match command.
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let config = ProjectConfig::load(global.config.as_deref())?;
        let labels = labels_for_paths(&self.paths, &config)?;
        print_serialized(&labels, global.format, |labels| {
            labels.iter().map(|label| format!("{label}\n")).collect()
        })
    }
}

/// Labels whose rules match any of `paths`, in configuration order.
pub fn labels_for_paths(paths: &[String], config: &ProjectConfig) -> Result<Vec<String>> {
    let rules = compile_rules(&config.labels)?;
    let files: Vec<ChangedFile> = paths
        .iter()
        .map(|path| ChangedFile {
            filename: path.clone(),
            status: "modified".to_string(),
            previous_filename: None,
        })
        .collect();

    Ok(matched_labels(&files, &rules)
        .into_iter()
        .filter_map(|(name, matched)| matched.then_some(name))
        .collect())
}
