//! Error types for the Slidegate rate limiter.

use thiserror::Error;

/// Main error type for Slidegate operations.
#[derive(Error, Debug)]
pub enum SlidegateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The execution engine returned a result the facade cannot decode
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The execution engine or delete collaborator failed
    #[error("Engine error: {0}")]
    Engine(#[from] anyhow::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Slidegate operations.
pub type Result<T> = std::result::Result<T, SlidegateError>;
