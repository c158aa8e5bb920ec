//! Report data structures and their serialized forms.

pub mod report;
pub mod yaml;

pub use report::{
    CheckOutcome, CheckReport, Finding, Job, OutcomeStatus, OutputFormat, ReportSummary, Severity,
};
pub use yaml::{from_yaml, read_yaml_file, to_yaml, write_yaml_file};
