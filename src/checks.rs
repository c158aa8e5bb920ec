//! The pull request jobs: title, linked issues and labels.
//!
//! Each job is independent and produces one [`CheckOutcome`](crate::data::CheckOutcome).

pub mod labels;
pub mod linked_issues;
pub mod title;

pub use labels::{
    compile_rules, default_label_rules, list_changed_files, matched_labels, plan_label_changes,
    sync_labels, CompiledLabelRule, LabelChange, LabelRule,
};
pub use linked_issues::{
    check_linked_issues, collect_linked_issues, evaluate_linked_issues, LinkedIssueRules,
};
pub use title::{check_pull_request_title, check_title, TitleSource};

/// GitHub label names compare case-insensitively.
pub(crate) fn find_label<'a>(labels: &'a [String], name: &str) -> Option<&'a String> {
    labels.iter().find(|label| label.eq_ignore_ascii_case(name))
}
