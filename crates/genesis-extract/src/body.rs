//! Raw body extractors.

use std::ops::Deref;

use bytes::Bytes;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// The raw request body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(pub Bytes);

impl RawBody {
    /// Consumes the RawBody and returns the inner Bytes.
    #[must_use]
    pub fn into_inner(self) -> Bytes {
        self.0
    }
}

impl Deref for RawBody {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for RawBody {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(RawBody(ctx.body().clone()))
    }
}

/// The request body as UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyString(pub String);

impl FromRequest for BodyString {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        std::str::from_utf8(ctx.body())
            .map(|text| BodyString(text.to_string()))
            .map_err(|e| {
                ExtractionError::invalid_type(ExtractionSource::Body, "body", e.to_string())
            })
    }
}
