//! Utility functions and helpers.

pub mod annotations;
pub mod settings;

pub use annotations::{running_in_actions, workflow_commands};
pub use settings::{get_env_var, get_env_vars, Settings};
