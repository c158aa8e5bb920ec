//! GitHub Actions workflow commands (`::error title=...::message`).

use std::env;

use crate::data::{CheckReport, Severity};

/// Whether the process runs inside GitHub Actions.
pub fn running_in_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true")
}

/// Escapes a command message.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a command property value.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Formats one workflow command.
pub fn workflow_command(severity: Severity, title: &str, message: &str) -> String {
    let command = match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    };
    format!(
        "::{command} title={}::{}",
        escape_property(title),
        escape_data(message)
    )
}

/// Workflow commands for every error and warning in the report.
pub fn workflow_commands(report: &CheckReport) -> Vec<String> {
    report
        .outcomes
        .iter()
        .flat_map(|outcome| {
            outcome
                .findings
                .iter()
                .filter(|finding| finding.severity != Severity::Info)
                .map(move |finding| {
                    workflow_command(
                        finding.severity,
                        &format!("{} check", outcome.job),
                        &finding.message,
                    )
                })
        })
        .collect()
}
