//! Core extractor trait.

use std::any::Any;

use crate::{ExtractionContext, ExtractionError};

/// Types that can be bound from a request as a handler argument.
///
/// Besides building itself, an extractor exposes the value it carries as its
/// *payload*. Validation filters look arguments up by payload type, so a
/// `Json<Todo>` argument is found by a filter for `Todo`.
///
/// ```rust
/// use genesis_extract::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
///
/// struct ApiVersion(u32);
///
/// impl FromRequest for ApiVersion {
///     fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
///         let raw = ctx
///             .header("x-api-version")
///             .ok_or_else(|| ExtractionError::missing(ExtractionSource::Query, "x-api-version"))?;
///         raw.parse().map(ApiVersion).map_err(|_| {
///             ExtractionError::invalid_type(ExtractionSource::Query, "x-api-version", "expected integer")
///         })
///     }
/// }
/// ```
pub trait FromRequest: Sized + Send + Sync + 'static {
    /// Extracts this type from the request context.
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError>;

    /// The value validation filters see. Defaults to the extractor itself.
    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self)
    }
}

// Optional extraction: `None` when the inner extractor fails.
impl<T: FromRequest> FromRequest for Option<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(T::from_request(ctx).ok())
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.as_ref().and_then(|inner| inner.payload())
    }
}
