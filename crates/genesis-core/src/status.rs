//! RFC 9110 status code registry.
//!
//! Maps every known HTTP status code to its section in RFC 9110. Problem
//! details use these URIs as their `type` member.
//!
//! ```
//! use genesis_core::StatusRegistry;
//!
//! let registry = StatusRegistry::global();
//! assert_eq!(
//!     registry.lookup(404).unwrap(),
//!     "https://httpwg.org/specs/rfc9110.html#status.404"
//! );
//! assert!(registry.lookup(799).is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use http::StatusCode;

use crate::error::{GenesisError, GenesisResult};

/// Prefix of every reference URI.
pub const RFC9110_STATUS_BASE: &str = "https://httpwg.org/specs/rfc9110.html#status.";

/// Status codes known to the HTTP stack.
pub const KNOWN_STATUS_CODES: &[StatusCode] = &[
    StatusCode::CONTINUE,
    StatusCode::SWITCHING_PROTOCOLS,
    StatusCode::PROCESSING,
    StatusCode::OK,
    StatusCode::CREATED,
    StatusCode::ACCEPTED,
    StatusCode::NON_AUTHORITATIVE_INFORMATION,
    StatusCode::NO_CONTENT,
    StatusCode::RESET_CONTENT,
    StatusCode::PARTIAL_CONTENT,
    StatusCode::MULTI_STATUS,
    StatusCode::ALREADY_REPORTED,
    StatusCode::IM_USED,
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::NOT_MODIFIED,
    StatusCode::USE_PROXY,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::PAYMENT_REQUIRED,
    StatusCode::FORBIDDEN,
    StatusCode::NOT_FOUND,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::NOT_ACCEPTABLE,
    StatusCode::PROXY_AUTHENTICATION_REQUIRED,
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::CONFLICT,
    StatusCode::GONE,
    StatusCode::LENGTH_REQUIRED,
    StatusCode::PRECONDITION_FAILED,
    StatusCode::PAYLOAD_TOO_LARGE,
    StatusCode::URI_TOO_LONG,
    StatusCode::UNSUPPORTED_MEDIA_TYPE,
    StatusCode::RANGE_NOT_SATISFIABLE,
    StatusCode::EXPECTATION_FAILED,
    StatusCode::IM_A_TEAPOT,
    StatusCode::MISDIRECTED_REQUEST,
    StatusCode::UNPROCESSABLE_ENTITY,
    StatusCode::LOCKED,
    StatusCode::FAILED_DEPENDENCY,
    StatusCode::UPGRADE_REQUIRED,
    StatusCode::PRECONDITION_REQUIRED,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
    StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::NOT_IMPLEMENTED,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
    StatusCode::HTTP_VERSION_NOT_SUPPORTED,
    StatusCode::VARIANT_ALSO_NEGOTIATES,
    StatusCode::INSUFFICIENT_STORAGE,
    StatusCode::LOOP_DETECTED,
    StatusCode::NOT_EXTENDED,
    StatusCode::NETWORK_AUTHENTICATION_REQUIRED,
];

/// Formats the RFC 9110 reference URI for a code.
#[must_use]
pub fn reference_uri(code: u16) -> String {
    format!("{RFC9110_STATUS_BASE}{code}")
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusEntry {
    /// Numeric status code
    pub code: u16,
    /// RFC 9110 section URI
    pub reference_uri: String,
}

/// Immutable code → reference URI map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegistry {
    entries: BTreeMap<u16, String>,
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegistry {
    /// Builds the registry from [`KNOWN_STATUS_CODES`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_codes(KNOWN_STATUS_CODES.iter().map(StatusCode::as_u16))
    }

    /// Builds a registry from arbitrary codes. Duplicates collapse.
    #[must_use]
    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        let entries = codes
            .into_iter()
            .map(|code| (code, reference_uri(code)))
            .collect();
        Self { entries }
    }

    /// Process-wide registry, built on first use.
    pub fn global() -> &'static StatusRegistry {
        static REGISTRY: OnceLock<StatusRegistry> = OnceLock::new();
        REGISTRY.get_or_init(StatusRegistry::new)
    }

    /// Returns the reference URI of a code.
    pub fn lookup(&self, code: u16) -> GenesisResult<&str> {
        self.entries
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| GenesisError::key_not_found(code))
    }

    /// Returns the reference URI of a [`StatusCode`].
    pub fn lookup_status(&self, status: StatusCode) -> GenesisResult<&str> {
        self.lookup(status.as_u16())
    }

    /// Returns true if the code is registered.
    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }

    /// Iterates over all entries in ascending code order.
    pub fn all(&self) -> impl Iterator<Item = StatusEntry> + '_ {
        self.entries.iter().map(|(code, uri)| StatusEntry {
            code: *code,
            reference_uri: uri.clone(),
        })
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
