//! Engine-level errors shared by the use cases.

use crate::ports::tool_executor::PublishError;
use thiserror::Error;
use toolrun_domain::{DomainError, RepositoryError};

/// Errors returned while handling one inbound message.
///
/// Catalog misses, malformed composite input and executor failures are not
/// errors: they are logged or carried as data. Only failures that leave the
/// run tree or the conversation in an unknown state surface here.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid dispatch trigger: {0}")]
    InvalidTrigger(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl EngineError {
    /// Whether redelivering the same message may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Repository(RepositoryError::Storage(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(EngineError::from(RepositoryError::Storage("disk".to_string())).is_retryable());
        assert!(!EngineError::from(PublishError::Transport("reset".to_string())).is_retryable());
        assert!(!EngineError::from(RepositoryError::AlreadyExists("a".to_string())).is_retryable());
        assert!(!EngineError::from(PublishError::Closed).is_retryable());
        assert!(!EngineError::from(DomainError::NoToolUse).is_retryable());
    }
}
