//! Extraction error types.

use std::fmt;

use genesis_core::ProblemDetails;
use http::StatusCode;
use thiserror::Error;

/// Part of the request an extractor was reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path parameters
    Path,
    /// Query string
    Query,
    /// Request body
    Body,
    /// Service scope
    Services,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
            Self::Services => "services",
        })
    }
}

/// Failure to bind a handler argument.
///
/// ```rust
/// use genesis_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::missing(ExtractionSource::Query, "message");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.field(), Some("message"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A required value is absent.
    #[error("missing required {from} parameter: {field}")]
    Missing {
        /// Where the value was expected.
        from: ExtractionSource,
        /// Name of the value.
        field: String,
    },

    /// A value could not be converted.
    #[error("invalid {from} parameter '{field}': {details}")]
    InvalidType {
        /// Where the value came from.
        from: ExtractionSource,
        /// Name of the value.
        field: String,
        /// Why conversion failed.
        details: String,
    },

    /// A whole source could not be deserialized.
    #[error("failed to deserialize {from}: {details}")]
    DeserializationFailed {
        /// The source being read.
        from: ExtractionSource,
        /// Deserializer message.
        details: String,
    },

    /// The body exceeds the extractor's limit.
    #[error("payload too large: max {max_size} bytes, got {actual_size} bytes")]
    PayloadTooLarge {
        /// Accepted size.
        max_size: usize,
        /// Received size.
        actual_size: usize,
    },

    /// A service could not be resolved for injection.
    #[error("{message}")]
    ServiceUnavailable {
        /// Requested service.
        service: String,
        /// Resolution failure.
        message: String,
    },
}

impl ExtractionError {
    /// A required value is absent.
    #[must_use]
    pub fn missing(from: ExtractionSource, field: impl Into<String>) -> Self {
        Self::Missing {
            from,
            field: field.into(),
        }
    }

    /// A value could not be converted.
    #[must_use]
    pub fn invalid_type(
        from: ExtractionSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            from,
            field: field.into(),
            details: details.into(),
        }
    }

    /// Deserialization of a whole source failed.
    #[must_use]
    pub fn deserialization_failed(from: ExtractionSource, details: impl Into<String>) -> Self {
        Self::DeserializationFailed {
            from,
            details: details.into(),
        }
    }

    /// The body exceeds the extractor's limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self::PayloadTooLarge {
            max_size,
            actual_size,
        }
    }

    /// A service could not be resolved for injection.
    #[must_use]
    pub fn service_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Part of the request being read.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        match self {
            Self::Missing { from, .. }
            | Self::InvalidType { from, .. }
            | Self::DeserializationFailed { from, .. } => *from,
            Self::PayloadTooLarge { .. } => ExtractionSource::Body,
            Self::ServiceUnavailable { .. } => ExtractionSource::Services,
        }
    }

    /// Name of the offending value, or service.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Missing { field, .. } | Self::InvalidType { field, .. } => Some(field),
            Self::ServiceUnavailable { service, .. } => Some(service),
            Self::DeserializationFailed { .. } | Self::PayloadTooLarge { .. } => None,
        }
    }

    /// Status answered for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Missing { .. } | Self::InvalidType { .. } | Self::DeserializationFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServiceUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Problem body answered for this error.
    #[must_use]
    pub fn to_problem_details(&self) -> ProblemDetails {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Invalid request");
        ProblemDetails::new(status, title).with_detail(self.to_string())
    }
}
