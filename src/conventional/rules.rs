//! Repository-specific rules applied on top of a successful parse.

use serde::{Deserialize, Serialize};

use super::ConventionalCommit;
use crate::data::Finding;

/// Commit types accepted when no `types` list is configured.
pub const DEFAULT_TYPES: &[&str] = &[
    "feat", "fix", "style", "build", "refactor", "ci", "test", "perf", "chore", "revert", "docs",
];

/// Title rules from the `title` section of the project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    /// Allowed commit types, matched case-sensitively.
    pub types: Vec<String>,
    /// Rejects headers without a scope.
    pub scope_required: bool,
    /// Allowed scopes; empty accepts any scope.
    pub scopes: Vec<String>,
    /// Maximum header length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            types: DEFAULT_TYPES.iter().map(|t| (*t).to_string()).collect(),
            scope_required: false,
            scopes: Vec::new(),
            max_length: None,
        }
    }
}

/// Checks a parsed header against the rules and returns every violation.
pub fn verify(commit: &ConventionalCommit, header: &str, rules: &TitleRules) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !rules.types.iter().any(|t| *t == commit.commit_type) {
        findings.push(Finding::error(
            "type",
            format!(
                "unknown type `{}`; expected one of: {}",
                commit.commit_type,
                rules.types.join(", ")
            ),
        ));
    }

    match &commit.scope {
        None if rules.scope_required => findings.push(Finding::error(
            "scope",
            "missing scope; expected `type(scope): description`",
        )),
        Some(scope) if !rules.scopes.is_empty() && !rules.scopes.contains(scope) => {
            findings.push(Finding::error(
                "scope",
                format!(
                    "unknown scope `{scope}`; expected one of: {}",
                    rules.scopes.join(", ")
                ),
            ));
        }
        _ => {}
    }

    if let Some(max_length) = rules.max_length {
        let length = header.chars().count();
        if length > max_length {
            findings.push(Finding::error(
                "length",
                format!("title is {length} characters long; the limit is {max_length}"),
            ));
        }
    }

    findings
}
