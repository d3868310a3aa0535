//! Error types for the orchestration core

use thiserror::Error;

/// Main error type for the orchestration core
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Executor error: {0}")]
    Executor(String),

    #[error("Retry engine error: {0}")]
    RetryEngine(String),

    #[error("UI sink error: {0}")]
    Ui(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for OrchestratorError {
    fn from(err: anyhow::Error) -> Self {
        OrchestratorError::Internal(err.to_string())
    }
}
