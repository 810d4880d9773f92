//! Query string extractors.

use std::any::Any;
use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// Deserializes the query string into `T`.
///
/// ```rust
/// use genesis_extract::{ExtractionContextBuilder, FromRequest, Query};
/// use http::Uri;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Echo {
///     message: String,
/// }
///
/// let ctx = ExtractionContextBuilder::new()
///     .uri(Uri::from_static("/api/echo?message=hello"))
///     .build();
///
/// let Query(echo) = Query::<Echo>::from_request(&ctx).unwrap();
/// assert_eq!(echo.message, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the Query and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for Query<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let query_string = ctx.query_string().unwrap_or("");

        let value: T = serde_urlencoded::from_str(query_string).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Query, e.to_string())
        })?;

        Ok(Query(value))
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(&self.0)
    }
}

/// The raw query string, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuery(pub Option<String>);

impl FromRequest for RawQuery {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(RawQuery(ctx.query_string().map(String::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionContextBuilder;
    use http::Uri;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ListParams {
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        done: Option<bool>,
    }

    fn ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContextBuilder::new()
            .uri(Uri::from_static(uri))
            .build()
    }

    #[test]
    fn test_query_typed_values() {
        let Query(params) =
            Query::<ListParams>::from_request(&ctx("/api/todos?limit=10&done=true")).unwrap();
        assert_eq!(
            params,
            ListParams {
                limit: Some(10),
                done: Some(true)
            }
        );
    }

    #[test]
    fn test_query_absent_is_empty() {
        let Query(params) = Query::<ListParams>::from_request(&ctx("/api/todos")).unwrap();
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_query_invalid_value() {
        let err = Query::<ListParams>::from_request(&ctx("/api/todos?limit=many")).unwrap_err();
        assert_eq!(err.extraction_source(), ExtractionSource::Query);
    }

    #[test]
    fn test_query_decodes_percent_encoding() {
        #[derive(Deserialize)]
        struct Echo {
            message: String,
        }
        let Query(echo) = Query::<Echo>::from_request(&ctx("/api/echo?message=hello%20world")).unwrap();
        assert_eq!(echo.message, "hello world");
    }

    #[test]
    fn test_raw_query() {
        let RawQuery(raw) = RawQuery::from_request(&ctx("/search?q=rust")).unwrap();
        assert_eq!(raw.as_deref(), Some("q=rust"));
    }
}
