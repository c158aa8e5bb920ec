//! Parse errors for conventional-commit headers and messages.

use thiserror::Error;

/// Reasons a header or message does not follow the conventional-commit format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConventionalCommitError {
    /// Nothing to parse.
    #[error("empty title")]
    Empty,

    /// The header does not start with a type.
    #[error("missing commit type; expected `type(scope): description`")]
    MissingType,

    /// The type is not followed by `:` (optionally after a scope and `!`).
    #[error("missing `:` separator after `{0}`; expected `type(scope): description`")]
    MissingSeparator(String),

    /// A scope was opened with `(` but never closed.
    #[error("unclosed scope; expected `)` after `({0}`")]
    UnclosedScope(String),

    /// The scope parentheses are empty.
    #[error("empty scope; remove the parentheses or name a scope")]
    EmptyScope,

    /// The scope contains characters that are not allowed.
    #[error("invalid scope `{0}`")]
    InvalidScope(String),

    /// The `:` separator is not followed by exactly one space.
    #[error("expected exactly one space after `:`")]
    SeparatorSpacing,

    /// Nothing follows the separator.
    #[error("empty description")]
    EmptyDescription,

    /// A body starts on the line right after the header.
    #[error("missing blank line between header and body")]
    MissingBlankLine,
}
