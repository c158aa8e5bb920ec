//! Conventional-commit parsing and rule verification.

mod error;
mod parser;
mod rules;

pub use error::ConventionalCommitError;
pub use parser::{parse_header, parse_message, ConventionalCommit, Footer};
pub use rules::{verify, TitleRules, DEFAULT_TYPES};
