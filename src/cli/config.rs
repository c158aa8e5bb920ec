//! Configuration-related CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::GlobalArgs;
use crate::config::{ProjectConfig, CONFIG_FILE_NAME};
use crate::data::{to_yaml, OutputFormat};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the effective configuration.
    Show(ShowCommand),
    /// Writes the default configuration to a file.
    Init(InitCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

/// Init command options.
#[derive(Parser)]
pub struct InitCommand {
    /// Overwrites an existing file.
    #[arg(long)]
    pub force: bool,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(global),
            ConfigSubcommands::Init(init_cmd) => init_cmd.execute(global),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let config = ProjectConfig::load(global.config.as_deref())?;
        let rendered = match global.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?
            }
            OutputFormat::Text | OutputFormat::Yaml => to_yaml(&config)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

impl InitCommand {
    /// Executes the init command.
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        let path = global
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        ProjectConfig::default().save(&path, self.force)?;
        println!("✅ Wrote default configuration to {}", path.display());
        Ok(())
    }
}
