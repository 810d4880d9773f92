//! JSON body extractor.

use std::any::Any;
use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// Default maximum body size for JSON extraction (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Deserializes the request body as JSON.
///
/// The payload seen by validation filters is the inner `T`.
///
/// ```rust
/// use genesis_extract::{ExtractionContextBuilder, FromRequest, Json};
/// use http::Method;
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::POST)
///     .body(r#""hello""#)
///     .build();
///
/// let Json(message) = Json::<String>::from_request(&ctx).unwrap();
/// assert_eq!(message, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the Json and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for Json<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let body = ctx.body();

        if body.len() > DEFAULT_MAX_BODY_SIZE {
            return Err(ExtractionError::payload_too_large(
                DEFAULT_MAX_BODY_SIZE,
                body.len(),
            ));
        }

        if body.is_empty() {
            return Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                "empty request body",
            ));
        }

        let value: T = serde_json::from_slice(body).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
        })?;

        Ok(Json(value))
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(&self.0)
    }
}
