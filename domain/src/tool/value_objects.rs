//! Tool domain value objects — errors raised while reading catalog entries
//! and composite tool input.

use thiserror::Error;

/// Invalid catalog entry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL scheme: expected {expected}, got {actual}")]
    InvalidScheme {
        expected: &'static str,
        actual: String,
    },
}

/// Malformed `batch_tool` input.
///
/// `NotAList` aborts expansion of the whole batch; every other variant only
/// skips the single invocation it was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchInputError {
    #[error("'invocations' is not a list")]
    NotAList,

    #[error("Invocation {index} is not an object")]
    NotAnObject { index: usize },

    #[error("Invocation {index} has no tool name")]
    MissingName { index: usize },

    #[error("Invocation {index} has invalid JSON arguments: {reason}")]
    InvalidJson { index: usize, reason: String },

    #[error("Invocation {index} arguments are neither a JSON string nor an object")]
    UnsupportedArguments { index: usize },
}
