//! Server error types.

use thiserror::Error;

/// Failures of the serve loop.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configured address is invalid or could not be bound.
    #[error("Bind error: {0}")]
    Bind(String),

    /// I/O failure while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
