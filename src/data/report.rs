//! Check outcomes, findings and the aggregated report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The independent jobs a pull request is checked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Job {
    /// Conventional-commit verification of the title.
    Title,
    /// Linked-issue existence and state check.
    LinkedIssues,
    /// Path-based label synchronisation.
    Labels,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Title => write!(f, "title"),
            Job::LinkedIssues => write!(f, "linked-issues"),
            Job::Labels => write!(f, "labels"),
        }
    }
}

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the job.
    Error,
    /// Reported, never fails the job.
    Warning,
    /// Progress and change notes.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A single observation made by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity level of the finding.
    pub severity: Severity,
    /// Short rule identifier (`type`, `state`, `label`, ...).
    pub rule: String,
    /// Human-readable explanation.
    pub message: String,
}

impl Finding {
    /// Creates an error finding.
    pub fn error(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule, message)
    }

    /// Creates a warning finding.
    pub fn warning(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, rule, message)
    }

    /// Creates an info finding.
    pub fn info(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, rule, message)
    }

    fn new(severity: Severity, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Final state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// No error findings.
    Passed,
    /// At least one error finding.
    Failed,
    /// The job did not apply to this event.
    Skipped,
}

/// Result of running one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Which job produced this outcome.
    pub job: Job,
    /// What was checked: a title, or a pull request reference.
    pub subject: String,
    /// Final state.
    pub status: OutcomeStatus,
    /// Everything the job reported.
    pub findings: Vec<Finding>,
}

impl CheckOutcome {
    /// Builds an outcome whose status is derived from the findings.
    pub fn from_findings(job: Job, subject: impl Into<String>, findings: Vec<Finding>) -> Self {
        let status = if findings.iter().any(|f| f.severity == Severity::Error) {
            OutcomeStatus::Failed
        } else {
            OutcomeStatus::Passed
        };
        Self {
            job,
            subject: subject.into(),
            status,
            findings,
        }
    }

    /// Builds a skipped outcome carrying the reason as an info finding.
    pub fn skipped(job: Job, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            job,
            subject: subject.into(),
            status: OutcomeStatus::Skipped,
            findings: vec![Finding::info("skipped", reason)],
        }
    }

    /// Whether the job failed.
    pub fn failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Summary statistics for a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of jobs in the report.
    pub total_jobs: usize,
    /// Jobs that passed.
    pub passed_jobs: usize,
    /// Jobs that failed.
    pub failed_jobs: usize,
    /// Jobs that did not apply.
    pub skipped_jobs: usize,
    /// Total number of error findings.
    pub error_count: usize,
    /// Total number of warning findings.
    pub warning_count: usize,
}

impl ReportSummary {
    /// Creates a summary from a list of outcomes.
    pub fn from_outcomes(outcomes: &[CheckOutcome]) -> Self {
        let count_status =
            |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        let count_severity = |severity: Severity| {
            outcomes
                .iter()
                .flat_map(|o| &o.findings)
                .filter(|f| f.severity == severity)
                .count()
        };

        Self {
            total_jobs: outcomes.len(),
            passed_jobs: count_status(OutcomeStatus::Passed),
            failed_jobs: count_status(OutcomeStatus::Failed),
            skipped_jobs: count_status(OutcomeStatus::Skipped),
            error_count: count_severity(Severity::Error),
            warning_count: count_severity(Severity::Warning),
        }
    }
}

/// Complete report over one or more jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Individual job outcomes.
    pub outcomes: Vec<CheckOutcome>,
    /// Summary statistics.
    pub summary: ReportSummary,
}

impl CheckReport {
    /// Creates a report from job outcomes.
    pub fn new(outcomes: Vec<CheckOutcome>) -> Self {
        let summary = ReportSummary::from_outcomes(&outcomes);
        Self { outcomes, summary }
    }

    /// Checks if any job failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.summary.failed_jobs > 0
    }

    /// Process exit code: 1 when any job failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }

    /// Renders the human-readable text form.
    pub fn render_text(&self) -> String {
        let mut output = String::new();

        for outcome in &self.outcomes {
            let icon = match outcome.status {
                OutcomeStatus::Passed => "✅",
                OutcomeStatus::Failed => "❌",
                OutcomeStatus::Skipped => "⏭️",
            };
            output.push_str(&format!("{icon} {}: {}\n", outcome.job, outcome.subject));
            for finding in &outcome.findings {
                output.push_str(&format!(
                    "   {} [{}] {}\n",
                    finding.severity, finding.rule, finding.message
                ));
            }
        }

        let summary = &self.summary;
        output.push_str(&format!(
            "\nSummary: {} job(s), {} passed, {} failed, {} skipped\n",
            summary.total_jobs, summary.passed_jobs, summary.failed_jobs, summary.skipped_jobs
        ));
        output
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_report() -> CheckReport {
        CheckReport::new(vec![
            CheckOutcome::from_findings(Job::Title, "fix: typo", vec![]),
            CheckOutcome::from_findings(
                Job::LinkedIssues,
                "acme/widgets#42",
                vec![Finding::error(
                    "missing",
                    "pull request does not have any linked issues",
                )],
            ),
            CheckOutcome::skipped(Job::Labels, "merge group", "not a pull request event"),
        ])
    }

    #[test]
    fn status_derived_from_findings() {
        let passed = CheckOutcome::from_findings(
            Job::Labels,
            "x",
            vec![Finding::info("label", "added"), Finding::warning("label", "w")],
        );
        assert_eq!(passed.status, OutcomeStatus::Passed);

        let failed = CheckOutcome::from_findings(Job::Title, "x", vec![Finding::error("type", "e")]);
        assert!(failed.failed());
    }

    #[test]
    fn summary_counts() {
        let report = sample_report();
        assert_eq!(report.summary.total_jobs, 3);
        assert_eq!(report.summary.passed_jobs, 1);
        assert_eq!(report.summary.failed_jobs, 1);
        assert_eq!(report.summary.skipped_jobs, 1);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.summary.warning_count, 0);
    }

    #[test]
    fn exit_code_reflects_failures() {
        assert_eq!(sample_report().exit_code(), 1);
        let ok = CheckReport::new(vec![CheckOutcome::from_findings(
            Job::Title,
            "fix: typo",
            vec![],
        )]);
        assert_eq!(ok.exit_code(), 0);
        assert_eq!(CheckReport::new(vec![]).exit_code(), 0);
    }

    #[test]
    fn text_rendering() {
        insta::assert_snapshot!(sample_report().render_text(), @r"
        ✅ title: fix: typo
        ❌ linked-issues: acme/widgets#42
           ERROR [missing] pull request does not have any linked issues
        ⏭️ labels: merge group
           INFO [skipped] not a pull request event

        Summary: 3 job(s), 1 passed, 1 failed, 1 skipped
        ");
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["outcomes"][1]["job"], "linked-issues");
        assert_eq!(json["outcomes"][1]["status"], "failed");
        assert_eq!(json["outcomes"][1]["findings"][0]["severity"], "error");
        assert_eq!(json["summary"]["failed_jobs"], 1);
    }
}
