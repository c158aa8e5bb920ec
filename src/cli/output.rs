//! Report output and exit status shared by the job commands.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use super::GlobalArgs;
use crate::data::{to_yaml, CheckOutcome, CheckReport, Finding, Job, OutputFormat};
use crate::utils::{running_in_actions, workflow_commands};

/// Prints the report, the workflow commands when enabled, and exits with
/// status 1 if any job failed.
pub fn emit_report(report: &CheckReport, global: &GlobalArgs) -> Result<()> {
    print_serialized(report, global.format, CheckReport::render_text)?;

    if annotations_enabled(global.annotations, global.format, running_in_actions()) {
        for command in workflow_commands(report) {
            println!("{command}");
        }
    }

    let exit_code = report.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Prints `value` in the requested format, using `render_text` for text output.
pub fn print_serialized<T: Serialize>(
    value: &T,
    format: OutputFormat,
    render_text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(value)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .context("Failed to serialize report to JSON")?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = to_yaml(value).context("Failed to serialize report to YAML")?;
            println!("{yaml}");
        }
    }
    Ok(())
}

/// Annotations go with text output only, when requested or inside Actions.
pub fn annotations_enabled(requested: bool, format: OutputFormat, in_actions: bool) -> bool {
    if format != OutputFormat::Text {
        if requested {
            warn!(format = %format, "Annotations are only printed with text output");
        }
        return false;
    }
    requested || in_actions
}

/// Converts an operational error into a failed outcome so other jobs still report.
pub fn outcome_or_failure(
    job: Job,
    subject: &str,
    result: Result<CheckOutcome>,
) -> CheckOutcome {
    result.unwrap_or_else(|err| {
        warn!(job = %job, error = %format!("{err:#}"), "Job failed to run");
        CheckOutcome::from_findings(job, subject, vec![Finding::error("error", format!("{err:#}"))])
    })
}
