//! Test client errors.

use thiserror::Error;

/// Errors raised while building a request or reading a response.
#[derive(Error, Debug)]
pub enum TestError {
    /// The request could not be assembled.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// The response body could not be read or decoded.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
