//! `help-all`: every command's help in one document.

use anyhow::Result;
use clap::{Command, CommandFactory, Parser};

use crate::cli::Cli;

/// Help command for displaying comprehensive usage information.
#[derive(Parser)]
pub struct HelpCommand {}

/// Renders the help of a command tree.
pub struct HelpGenerator {
    app: Command,
}

impl Default for HelpGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpGenerator {
    /// Creates a generator for the pr-conventions command tree.
    pub fn new() -> Self {
        Self {
            app: Cli::command(),
        }
    }

    /// Renders the root help followed by every subcommand, depth first.
    ///
    /// Siblings are sorted by name so the output is stable.
    pub fn generate_all_help(&self) -> String {
        let mut sections = vec![render_section(&self.app, None)];
        collect_sections(&self.app, self.app.get_name(), &mut sections);
        sections.join(&format!("\n\n{}\n\n", "=".repeat(80)))
    }
}

fn collect_sections(cmd: &Command, prefix: &str, sections: &mut Vec<String>) {
    let mut children: Vec<&Command> = cmd
        .get_subcommands()
        .filter(|child| child.get_name() != "help")
        .collect();
    children.sort_by(|a, b| a.get_name().cmp(b.get_name()));

    for child in children {
        let path = format!("{prefix} {}", child.get_name());
        sections.push(render_section(child, Some(&path)));
        collect_sections(child, &path, sections);
    }
}

fn render_section(cmd: &Command, path: Option<&str>) -> String {
    let title = path.unwrap_or_else(|| cmd.get_name());
    let about = cmd
        .get_about()
        .map_or_else(|| "No description available".to_string(), ToString::to_string);
    format!("{title} - {about}\n\n{}", cmd.clone().render_help())
}

impl HelpCommand {
    /// Executes the help command.
    pub fn execute(self) -> Result<()> {
        println!("{}", HelpGenerator::new().generate_all_help());
        Ok(())
    }
}
