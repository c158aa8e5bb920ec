//! CLI interface for pr-conventions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::data::OutputFormat;

pub mod config;
pub mod context;
pub mod help;
pub mod issues;
pub mod labels;
pub mod output;
pub mod run;
pub mod title;

/// pr-conventions: pull request checks for CI.
#[derive(Parser)]
#[command(name = "pr-conventions")]
#[command(
    about = "Pull request checks: conventional titles, linked issues and path labels",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Project config file (defaults to ./.pr-conventions.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository as OWNER/NAME (defaults to GITHUB_REPOSITORY or the event payload).
    #[arg(long, global = true, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Pull request number (defaults to the event payload).
    #[arg(long, global = true, value_name = "N")]
    pub pr: Option<u64>,

    /// Report format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Prints GitHub Actions workflow commands for errors and warnings.
    /// Text output only; enabled automatically when GITHUB_ACTIONS=true.
    #[arg(long, global = true)]
    pub annotations: bool,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Conventional-commit title verification.
    Title(title::TitleCommand),
    /// Linked-issue verification.
    Issues(issues::IssuesCommand),
    /// Path-based label assignment.
    Labels(labels::LabelsCommand),
    /// Runs every job for the current event.
    Run(run::RunCommand),
    /// Project configuration.
    Config(config::ConfigCommand),
    /// Displays comprehensive help for all commands.
    #[command(name = "help-all")]
    HelpAll(help::HelpCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        let global = self.global;
        match self.command {
            Commands::Title(title_cmd) => title_cmd.execute(&global).await,
            Commands::Issues(issues_cmd) => issues_cmd.execute(&global).await,
            Commands::Labels(labels_cmd) => labels_cmd.execute(&global).await,
            Commands::Run(run_cmd) => run_cmd.execute(&global).await,
            Commands::Config(config_cmd) => config_cmd.execute(&global),
            Commands::HelpAll(help_cmd) => help_cmd.execute(),
        }
    }
}
