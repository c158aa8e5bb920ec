//! Parser for `type(scope)!: description` headers and full commit messages.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ConventionalCommitError;

/// A parsed conventional commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    /// Commit type (`feat`, `fix`, ...).
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Optional scope between parentheses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Set by a `!` marker or a `BREAKING CHANGE` footer.
    pub breaking: bool,
    /// Text after the `: ` separator.
    pub description: String,
    /// Free-form body paragraphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Trailing `Token: value` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footers: Vec<Footer>,
}

/// A footer (trailer) line such as `Refs: #123` or `BREAKING CHANGE: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    /// Footer token.
    pub token: String,
    /// Footer value, continuation lines joined with newlines.
    pub value: String,
}

impl Footer {
    /// Whether this footer announces a breaking change.
    pub fn is_breaking_change(&self) -> bool {
        self.token == "BREAKING CHANGE" || self.token == "BREAKING-CHANGE"
    }
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static FOOTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>BREAKING[ -]CHANGE|[A-Za-z][A-Za-z0-9-]*)(?:: | #)(?P<value>.*)$")
        .unwrap()
});

/// Parses a single header line.
///
/// The type is one or more ASCII letters, the scope is optional and the
/// separator is a colon followed by exactly one space.
pub fn parse_header(header: &str) -> Result<ConventionalCommit, ConventionalCommitError> {
    if header.trim().is_empty() {
        return Err(ConventionalCommitError::Empty);
    }

    let type_end = header
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(header.len());
    let commit_type = &header[..type_end];
    if commit_type.is_empty() {
        return Err(ConventionalCommitError::MissingType);
    }
    let mut rest = &header[type_end..];

    let scope = match rest.strip_prefix('(') {
        Some(open) => {
            let close = open
                .find(')')
                .ok_or_else(|| ConventionalCommitError::UnclosedScope(open.to_string()))?;
            let scope = &open[..close];
            if scope.trim().is_empty() {
                return Err(ConventionalCommitError::EmptyScope);
            }
            if scope.contains(['(', '\n', '\r']) {
                return Err(ConventionalCommitError::InvalidScope(scope.to_string()));
            }
            rest = &open[close + 1..];
            Some(scope.to_string())
        }
        None => None,
    };

    let breaking = match rest.strip_prefix('!') {
        Some(after) => {
            rest = after;
            true
        }
        None => false,
    };

    let Some(after_colon) = rest.strip_prefix(':') else {
        let consumed = &header[..header.len() - rest.len()];
        return Err(ConventionalCommitError::MissingSeparator(
            consumed.to_string(),
        ));
    };
    if after_colon.trim().is_empty() {
        return Err(ConventionalCommitError::EmptyDescription);
    }
    let Some(description) = after_colon.strip_prefix(' ') else {
        return Err(ConventionalCommitError::SeparatorSpacing);
    };
    if description.starts_with(char::is_whitespace) {
        return Err(ConventionalCommitError::SeparatorSpacing);
    }

    Ok(ConventionalCommit {
        commit_type: commit_type.to_string(),
        scope,
        breaking,
        description: description.trim_end().to_string(),
        body: None,
        footers: Vec::new(),
    })
}

/// Parses a full commit message: header, optional body and footers.
///
/// The last paragraph is read as footers only when every line in it is a
/// footer or an indented continuation of one.
pub fn parse_message(message: &str) -> Result<ConventionalCommit, ConventionalCommitError> {
    let message = message.trim();
    let mut lines = message.lines();
    let header = lines.next().ok_or(ConventionalCommitError::Empty)?;
    let mut commit = parse_header(header)?;

    let remaining: Vec<&str> = lines.collect();
    let Some((separator, rest)) = remaining.split_first() else {
        return Ok(commit);
    };
    if !separator.trim().is_empty() {
        return Err(ConventionalCommitError::MissingBlankLine);
    }

    let paragraphs = split_paragraphs(rest);
    let (body_paragraphs, footers) = match paragraphs.split_last() {
        Some((last, earlier)) => match parse_footers(last) {
            Some(footers) => (earlier, footers),
            None => (&paragraphs[..], Vec::new()),
        },
        None => (&paragraphs[..], Vec::new()),
    };

    if !body_paragraphs.is_empty() {
        let body = body_paragraphs
            .iter()
            .map(|paragraph| paragraph.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        commit.body = Some(body);
    }
    commit.breaking |= footers.iter().any(Footer::is_breaking_change);
    commit.footers = footers;

    Ok(commit)
}

fn split_paragraphs<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(*line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

fn parse_footers(lines: &[&str]) -> Option<Vec<Footer>> {
    let mut footers: Vec<Footer> = Vec::new();
    for line in lines {
        if let Some(caps) = FOOTER_PATTERN.captures(line) {
            footers.push(Footer {
                token: caps["token"].to_string(),
                value: caps["value"].trim().to_string(),
            });
        } else if line.starts_with(char::is_whitespace) {
            // Continuation of the previous footer value
            let last = footers.last_mut()?;
            last.value.push('\n');
            last.value.push_str(line.trim());
        } else {
            return None;
        }
    }
    Some(footers)
}
