//! A newtype for validating simple values.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// Wraps a value that is parsed from text and validated as `T`.
///
/// Types that deserialize from a string take the text as is. Anything else
/// reads it as JSON, so numbers, booleans and objects can be given as plain
/// text.
///
/// As a handler argument it binds from the route's only path parameter,
/// then from a non-empty body, then from the first query pair. Its payload
/// is the inner `T`, so a validator for `T` applies to it.
///
/// ```rust
/// use genesis_extract::Validatable;
///
/// let id: Validatable<u32> = "10".parse().unwrap();
/// assert_eq!(*id, 10);
///
/// let name: Validatable<String> = "Hello World!".parse().unwrap();
/// assert_eq!(name.into_inner(), "Hello World!");
///
/// assert!("ten".parse::<Validatable<u32>>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Validatable<T>(pub T);

impl<T> Validatable<T> {
    /// Consumes the wrapper and returns the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validatable<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromStr for Validatable<T> {
    type Err = serde_json::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(text.to_string()))
            .or_else(|_| serde_json::from_str(text))
            .map(Validatable)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Validatable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor<T>(std::marker::PhantomData<T>);

        impl<T: DeserializeOwned> Visitor<'_> for TextVisitor<T> {
            type Value = Validatable<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a value given as text")
            }

            fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                text.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TextVisitor(std::marker::PhantomData))
    }
}

impl<T> FromRequest for Validatable<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let (source, field, text) = bound_text(ctx)?;
        text.parse().map_err(|e: serde_json::Error| {
            ExtractionError::invalid_type(source, field, e.to_string())
        })
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(&self.0)
    }
}

fn bound_text(ctx: &ExtractionContext) -> Result<(ExtractionSource, String, String), ExtractionError> {
    let params = ctx.path_params();
    if params.len() == 1 {
        if let Some((name, value)) = params.iter().next() {
            return Ok((ExtractionSource::Path, name.to_string(), value.to_string()));
        }
    }

    if !ctx.body().is_empty() {
        let text = std::str::from_utf8(ctx.body()).map_err(|e| {
            ExtractionError::invalid_type(ExtractionSource::Body, "body", e.to_string())
        })?;
        return Ok((ExtractionSource::Body, "body".to_string(), text.to_string()));
    }

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(ctx.query_string().unwrap_or("")).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Query, e.to_string())
        })?;
    pairs
        .into_iter()
        .next()
        .map(|(name, value)| (ExtractionSource::Query, name, value))
        .ok_or_else(|| ExtractionError::missing(ExtractionSource::Query, "<value>"))
}
