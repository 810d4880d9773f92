//! Problem details response bodies.
//!
//! Serialized as `{"title", "status", "type", "detail"}` where `detail` is
//! either a plain message or a map from property name to its messages.

use http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::status::StatusRegistry;

/// Content type of problem details bodies.
pub const PROBLEM_JSON_CONTENT_TYPE: &str = "application/problem+json";

/// Title used when no validator can be applied to a request.
pub const VALIDATION_UNAVAILABLE_TITLE: &str = "Validation could not be performed.";

/// Title used when a validator rejects a request.
pub const VALIDATION_FAILED_TITLE: &str = "Validation error has occurred.";

/// `detail` member of a problem details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProblemDetail {
    /// Free-form message.
    Message(String),
    /// Property name to error messages, in first-seen order.
    Errors(IndexMap<String, Vec<String>>),
}

/// A structured error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Short summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Reference URI for the status.
    #[serde(rename = "type")]
    pub type_uri: String,
    /// Further detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ProblemDetail>,
}

impl ProblemDetails {
    /// Creates a problem with the registry URI for `status`, or `about:blank`
    /// when the code is not registered.
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        let type_uri = StatusRegistry::global()
            .lookup_status(status)
            .map_or_else(|_| "about:blank".to_string(), str::to_string);
        Self {
            title: title.into(),
            status: status.as_u16(),
            type_uri,
            detail: None,
        }
    }

    /// Sets a message detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(ProblemDetail::Message(detail.into()));
        self
    }

    /// Sets a grouped-errors detail.
    pub fn with_errors(mut self, errors: IndexMap<String, Vec<String>>) -> Self {
        self.detail = Some(ProblemDetail::Errors(errors));
        self
    }

    /// 403 problem for a request whose argument of `type_name` could not be
    /// validated.
    pub fn validation_unavailable(type_name: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, VALIDATION_UNAVAILABLE_TITLE)
            .with_detail(format!("Could not find validator for {type_name}"))
    }

    /// 400 problem listing `(property, message)` failures grouped by property.
    pub fn validation_failed<I, P, M>(failures: I) -> Self
    where
        I: IntoIterator<Item = (P, M)>,
        P: Into<String>,
        M: Into<String>,
    {
        let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
        for (property, message) in failures {
            errors.entry(property.into()).or_default().push(message.into());
        }
        Self::new(StatusCode::BAD_REQUEST, VALIDATION_FAILED_TITLE).with_errors(errors)
    }

    /// Status as an [`http::StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the messages recorded for a property.
    pub fn errors_for(&self, property: &str) -> Option<&[String]> {
        match &self.detail {
            Some(ProblemDetail::Errors(map)) => map.get(property).map(Vec::as_slice),
            _ => None,
        }
    }

    /// Serializes the body.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        // A struct of strings and maps of strings always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }
}
