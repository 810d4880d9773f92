//! Error types for Genesis.
//!
//! [`GenesisError`] covers the configuration-time failures of endpoint mapping
//! and service resolution, plus registry lookups. Request-time validation
//! problems are not errors: they are turned into problem-details responses by
//! the validation filter.

use http::StatusCode;
use thiserror::Error;

use crate::naming::short_type_name;

/// Result type alias using [`GenesisError`].
pub type GenesisResult<T> = Result<T, GenesisError>;

/// Standard error type for Genesis.
///
/// # Example
///
/// ```
/// use genesis_core::GenesisError;
///
/// struct Greeter;
///
/// let err = GenesisError::service_not_found::<Greeter>();
/// assert_eq!(err.to_string(), "Cannot find registered service Greeter");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenesisError {
    /// An argument passed to a startup API is not acceptable.
    #[error("{message} (Parameter '{name}')")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: String,
        /// Human-readable message.
        message: String,
    },

    /// A service was requested that is not registered in the container.
    #[error("Cannot find registered service {type_name}")]
    ServiceNotFound {
        /// Short name of the requested type.
        type_name: String,
    },

    /// A status code is not present in the status registry.
    #[error("Status code {code} is not a known status code")]
    KeyNotFound {
        /// The unknown code.
        code: u16,
    },

    /// Internal invariant failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable message.
        message: String,
    },
}

impl GenesisError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a service-not-found error naming `T`.
    #[must_use]
    pub fn service_not_found<T: ?Sized>() -> Self {
        Self::ServiceNotFound {
            type_name: short_type_name::<T>().to_string(),
        }
    }

    /// Creates a key-not-found error for a status code.
    #[must_use]
    pub fn key_not_found(code: u16) -> Self {
        Self::KeyNotFound { code }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status code used when this error surfaces in a response.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::KeyNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceNotFound { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true for errors raised while configuring an application.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::ServiceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SampleEndpoints;

    #[test]
    fn test_invalid_argument_display() {
        let err = GenesisError::invalid_argument("type", "SampleEndpoints must be a static class!");
        assert_eq!(
            err.to_string(),
            "SampleEndpoints must be a static class! (Parameter 'type')"
        );
        assert!(err.is_configuration());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_not_found_uses_short_name() {
        let err = GenesisError::service_not_found::<SampleEndpoints>();
        assert_eq!(
            err,
            GenesisError::ServiceNotFound {
                type_name: "SampleEndpoints".to_string()
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_key_not_found() {
        let err = GenesisError::key_not_found(799);
        assert!(err.to_string().contains("799"));
        assert!(!err.is_configuration());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal() {
        let err = GenesisError::internal("argument slot 2 was already taken");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
