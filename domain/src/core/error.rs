//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Turn is not from the model (role: {0})")]
    NotModelTurn(String),

    #[error("Turn contains no tool use requests")]
    NoToolUse,

    #[error("Missing conversation context: {0}")]
    MissingContext(&'static str),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::NoToolUse.is_cancelled());
        assert!(!DomainError::NotModelTurn("user".to_string()).is_cancelled());
        assert!(!DomainError::MissingContext("thread_id").is_cancelled());
    }

    #[test]
    fn test_missing_context_display() {
        let error = DomainError::MissingContext("thread_id");
        assert_eq!(error.to_string(), "Missing conversation context: thread_id");
    }
}
