//! The validator contract consumed by the validation filter.
//!
//! A validator for `T` is registered in the [`Container`] as
//! `dyn Validator<T>` and resolved per request.
//!
//! ```
//! use genesis_core::validator::{validator_fn, ValidationFailure, ValidationResult, Validator};
//!
//! struct Echo {
//!     message: String,
//! }
//!
//! let validator = validator_fn(|echo: &Echo| {
//!     if echo.message.is_empty() {
//!         ValidationResult::from_failures([ValidationFailure::new("Message", "Message is required")])
//!     } else {
//!         ValidationResult::valid()
//!     }
//! });
//!
//! let result = tokio_test::block_on(validator.validate(&Echo { message: String::new() }));
//! assert!(!result.is_valid());
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use crate::di::{Container, Lifetime, Scope};
use crate::error::GenesisResult;
use crate::problem::ProblemDetails;

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Name of the failing property
    pub property_name: String,
    /// Error message
    pub message: String,
}

impl ValidationFailure {
    /// Creates a failure.
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
        }
    }
}

/// Result of running a validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Failures in the order they were found
    pub errors: Vec<ValidationFailure>,
}

impl ValidationResult {
    /// A result with no failures.
    pub fn valid() -> Self {
        Self::default()
    }

    /// Collects failures.
    pub fn from_failures(failures: impl IntoIterator<Item = ValidationFailure>) -> Self {
        Self {
            errors: failures.into_iter().collect(),
        }
    }

    /// True when no check failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The 400 problem body for these failures.
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails::validation_failed(
            self.errors
                .iter()
                .map(|failure| (failure.property_name.as_str(), failure.message.as_str())),
        )
    }
}

/// Validates values of type `T`.
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Checks `value`.
    fn validate<'a>(&'a self, value: &'a T) -> BoxFuture<'a, ValidationResult>;
}

impl<T: ?Sized, V: Validator<T> + ?Sized> Validator<T> for Arc<V> {
    fn validate<'a>(&'a self, value: &'a T) -> BoxFuture<'a, ValidationResult> {
        (**self).validate(value)
    }
}

/// A synchronous closure used as a validator.
pub struct FnValidator<T: ?Sized, F> {
    check: F,
    _marker: PhantomData<fn(&T)>,
}

/// Wraps a closure as a [`Validator`].
pub fn validator_fn<T, F>(check: F) -> FnValidator<T, F>
where
    T: ?Sized,
    F: Fn(&T) -> ValidationResult + Send + Sync,
{
    FnValidator {
        check,
        _marker: PhantomData,
    }
}

impl<T, F> Validator<T> for FnValidator<T, F>
where
    T: ?Sized,
    F: Fn(&T) -> ValidationResult + Send + Sync,
{
    fn validate<'a>(&'a self, value: &'a T) -> BoxFuture<'a, ValidationResult> {
        let result = (self.check)(value);
        Box::pin(std::future::ready(result))
    }
}

impl Container {
    /// Registers `V` as the validator for `T`.
    pub fn add_validator<T, V, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: ?Sized + 'static,
        V: Validator<T> + 'static,
        F: Fn(&Scope) -> GenesisResult<V> + Send + Sync + 'static,
    {
        self.add::<dyn Validator<T>, _>(lifetime, move |scope: &Scope| {
            let validator: Arc<dyn Validator<T>> = Arc::new(factory(scope)?);
            Ok(validator)
        })
    }

    /// Registers `V` as the scoped validator for `T`.
    pub fn add_scoped_validator<T, V, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static,
        V: Validator<T> + 'static,
        F: Fn(&Scope) -> GenesisResult<V> + Send + Sync + 'static,
    {
        self.add_validator::<T, V, F>(Lifetime::Scoped, factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Todo {
        title: String,
    }

    fn title_required() -> impl Validator<Todo> {
        validator_fn(|todo: &Todo| {
            if todo.title.trim().is_empty() {
                ValidationResult::from_failures([ValidationFailure::new(
                    "Title",
                    "Title must not be empty",
                )])
            } else {
                ValidationResult::valid()
            }
        })
    }

    #[tokio::test]
    async fn test_fn_validator() {
        let validator = title_required();
        assert!(validator.validate(&Todo { title: "walk".into() }).await.is_valid());
        let result = validator.validate(&Todo { title: " ".into() }).await;
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].property_name, "Title");
    }

    #[tokio::test]
    async fn test_registered_validator_resolves_as_trait_object() {
        let mut container = Container::new();
        container.add_scoped_validator::<Todo, _, _>(|_| Ok(title_required()));
        let container = Arc::new(container);

        assert_eq!(
            container.lifetime_of::<dyn Validator<Todo>>(),
            Some(Lifetime::Scoped)
        );
        let validator = container.resolve::<dyn Validator<Todo>>().unwrap();
        assert!(!validator.validate(&Todo { title: String::new() }).await.is_valid());
    }

    #[test]
    fn test_to_problem_details() {
        let result = ValidationResult::from_failures([
            ValidationFailure::new("Message", "Message is required"),
            ValidationFailure::new("Message", "Message is too short"),
        ]);
        let problem = result.to_problem_details();
        assert_eq!(problem.status, 400);
        assert_eq!(
            problem.errors_for("Message").unwrap(),
            ["Message is required", "Message is too short"]
        );
    }
}
