//! # pr-conventions
//!
//! Pull request convention checks for CI runners.
//!
//! ## Features
//!
//! - Conventional-commit verification of pull request titles and merge-queue commits
//! - Linked-issue checks backed by the GitHub GraphQL API
//! - Path-based label synchronisation driven by the changed-file list
//!
//! ## Quick Start
//!
//! ```rust
//! use pr_conventions::conventional::parse_header;
//!
//! let commit = parse_header("fix(router): handle empty payloads").unwrap();
//! assert_eq!(commit.commit_type, "fix");
//! assert_eq!(commit.scope.as_deref(), Some("router"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod checks;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod data;
pub mod git;
pub mod github;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of pr-conventions.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
