//! Path parameter extractor.

use std::any::Any;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// Deserializes the matched path parameters into `T`.
///
/// `T` is either a struct with one field per parameter, or a single value
/// when the route captures exactly one parameter.
///
/// ```rust
/// use genesis_extract::{ExtractionContextBuilder, FromRequest, Path};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct TodoPath {
///     id: u64,
/// }
///
/// let ctx = ExtractionContextBuilder::new().path_param("id", "42").build();
///
/// let Path(path) = Path::<TodoPath>::from_request(&ctx).unwrap();
/// assert_eq!(path.id, 42);
///
/// let Path(id) = Path::<u64>::from_request(&ctx).unwrap();
/// assert_eq!(id, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Consumes the Path and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Deserialize)]
struct Single<T> {
    value: T,
}

impl<T> FromRequest for Path<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let params = ctx.path_params();
        if params.is_empty() {
            return Err(ExtractionError::missing(
                ExtractionSource::Path,
                "<path parameters>",
            ));
        }

        // serde_urlencoded coerces the captured strings to the field types.
        let encoded = serde_urlencoded::to_string(params.to_pairs()).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Path, e.to_string())
        })?;

        let structured = serde_urlencoded::from_str::<T>(&encoded);
        let value = match structured {
            Ok(value) => value,
            Err(err) if params.len() == 1 => {
                let (_, raw) = params
                    .iter()
                    .next()
                    .ok_or_else(|| ExtractionError::missing(ExtractionSource::Path, "<path parameters>"))?;
                let single = serde_urlencoded::to_string([("value", raw)]).map_err(|e| {
                    ExtractionError::deserialization_failed(ExtractionSource::Path, e.to_string())
                })?;
                serde_urlencoded::from_str::<Single<T>>(&single)
                    .map(|single| single.value)
                    .map_err(|_| {
                        ExtractionError::deserialization_failed(ExtractionSource::Path, err.to_string())
                    })?
            }
            Err(err) => {
                return Err(ExtractionError::deserialization_failed(
                    ExtractionSource::Path,
                    err.to_string(),
                ))
            }
        };

        Ok(Path(value))
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(&self.0)
    }
}

/// Parses a single path parameter by name.
pub fn path_param<T: std::str::FromStr>(
    ctx: &ExtractionContext,
    name: &str,
) -> Result<T, ExtractionError> {
    let value = ctx
        .path_params()
        .get(name)
        .ok_or_else(|| ExtractionError::missing(ExtractionSource::Path, name))?;

    value.parse().map_err(|_| {
        ExtractionError::invalid_type(
            ExtractionSource::Path,
            name,
            format!("failed to parse as {}", genesis_core::short_type_name::<T>()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionContextBuilder;

    #[derive(Debug, Deserialize, PartialEq)]
    struct PostPath {
        user: String,
        post: u32,
    }

    #[test]
    fn test_path_struct() {
        let ctx = ExtractionContextBuilder::new()
            .path_param("user", "ada")
            .path_param("post", "7")
            .build();
        let Path(path) = Path::<PostPath>::from_request(&ctx).unwrap();
        assert_eq!(
            path,
            PostPath {
                user: "ada".into(),
                post: 7
            }
        );
    }

    #[test]
    fn test_path_single_value() {
        let ctx = ExtractionContextBuilder::new().path_param("id", "3").build();
        let Path(id) = Path::<u32>::from_request(&ctx).unwrap();
        assert_eq!(id, 3);
        let Path(text) = Path::<String>::from_request(&ctx).unwrap();
        assert_eq!(text, "3");
    }

    #[test]
    fn test_path_missing() {
        let ctx = ExtractionContextBuilder::new().build();
        let err = Path::<u32>::from_request(&ctx).unwrap_err();
        assert_eq!(err.extraction_source(), ExtractionSource::Path);
    }

    #[test]
    fn test_path_bad_value() {
        let ctx = ExtractionContextBuilder::new().path_param("id", "x").build();
        assert!(Path::<u32>::from_request(&ctx).is_err());
    }

    #[test]
    fn test_path_param_helper() {
        let ctx = ExtractionContextBuilder::new().path_param("id", "9").build();
        let id: u64 = path_param(&ctx, "id").unwrap();
        assert_eq!(id, 9);
        assert!(path_param::<u64>(&ctx, "other").is_err());
    }
}
