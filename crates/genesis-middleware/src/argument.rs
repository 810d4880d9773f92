//! Type-erased handler arguments and validation requirements.

use std::any::{Any, TypeId};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use genesis_core::short_type_name;
use genesis_extract::{ExtractionContext, ExtractionError, FromRequest, Json, Path, Query, Validatable};

use crate::{EndpointFilter, ValidationFilter};

/// A bound argument as filters see it.
pub trait ErasedArgument: Send + Sync {
    /// The value validation filters inspect.
    fn payload(&self) -> Option<&(dyn Any + Send + Sync)>;

    /// Short name of the argument's type.
    fn type_name(&self) -> &'static str;

    /// Recovers the concrete argument.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<E: FromRequest> ErasedArgument for E {
    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        FromRequest::payload(self)
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<E>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Boxed argument stored in a [`FilterContext`](crate::FilterContext).
pub type BoxedArgument = Box<dyn ErasedArgument>;

/// Something a handler can take as a parameter.
///
/// Every [`FromRequest`] extractor is an argument. [`Validate`] wraps an
/// extractor and additionally declares a validation requirement for the
/// extractor's payload type.
pub trait Argument: Sized + Send + 'static {
    /// Binds the argument from the request.
    fn extract(ctx: &ExtractionContext) -> Result<BoxedArgument, ExtractionError>;

    /// Recovers the argument after the filters ran.
    fn restore(argument: BoxedArgument) -> Option<Self>;

    /// The validation filter this parameter asks for, if any.
    fn validation_requirement() -> Option<ValidationRequirement> {
        None
    }
}

impl<E: FromRequest> Argument for E {
    fn extract(ctx: &ExtractionContext) -> Result<BoxedArgument, ExtractionError> {
        Ok(Box::new(E::from_request(ctx)?))
    }

    fn restore(argument: BoxedArgument) -> Option<Self> {
        argument.into_any().downcast::<E>().ok().map(|argument| *argument)
    }
}

/// Extractors whose payload has a fixed type.
pub trait TypedPayload: FromRequest {
    /// Type of [`FromRequest::payload`].
    type Payload: Send + Sync + 'static;
}

impl<T> TypedPayload for Json<T>
where
    Json<T>: FromRequest,
    T: Send + Sync + 'static,
{
    type Payload = T;
}

impl<T> TypedPayload for Query<T>
where
    Query<T>: FromRequest,
    T: Send + Sync + 'static,
{
    type Payload = T;
}

impl<T> TypedPayload for Path<T>
where
    Path<T>: FromRequest,
    T: Send + Sync + 'static,
{
    type Payload = T;
}

impl<T> TypedPayload for Validatable<T>
where
    Validatable<T>: FromRequest,
    T: Send + Sync + 'static,
{
    type Payload = T;
}

impl<E: TypedPayload> TypedPayload for Option<E> {
    type Payload = E::Payload;
}

/// Marks a handler parameter for validation.
///
/// The endpoint gets a [`ValidationFilter`] for the wrapped extractor's
/// payload type, so `Validate<Json<EchoRequest>>` asks for a validator of
/// `EchoRequest`.
#[derive(Debug, Clone)]
pub struct Validate<E>(pub E);

impl<E> Validate<E> {
    /// Consumes the marker and returns the extractor.
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> Deref for Validate<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E: TypedPayload> Argument for Validate<E> {
    fn extract(ctx: &ExtractionContext) -> Result<BoxedArgument, ExtractionError> {
        <E as Argument>::extract(ctx)
    }

    fn restore(argument: BoxedArgument) -> Option<Self> {
        <E as Argument>::restore(argument).map(Validate)
    }

    fn validation_requirement() -> Option<ValidationRequirement> {
        Some(ValidationRequirement::of::<E::Payload>())
    }
}

/// A request for a [`ValidationFilter`] of one payload type.
#[derive(Clone, Copy)]
pub struct ValidationRequirement {
    type_id: TypeId,
    type_name: &'static str,
    factory: fn() -> Arc<dyn EndpointFilter>,
}

fn validation_filter<T: Send + Sync + 'static>() -> Arc<dyn EndpointFilter> {
    Arc::new(ValidationFilter::<T>::new())
}

impl ValidationRequirement {
    /// Requirement for validating `T`.
    #[must_use]
    pub fn of<T: Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            factory: validation_filter::<T>,
        }
    }

    /// Type to validate.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short name of the type to validate.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Builds the filter.
    #[must_use]
    pub fn create_filter(&self) -> Arc<dyn EndpointFilter> {
        (self.factory)()
    }
}

impl PartialEq for ValidationRequirement {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ValidationRequirement {}

impl fmt::Debug for ValidationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidationRequirement").field(&self.type_name).finish()
    }
}

/// Requirements in declaration order, each type at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRequirements {
    items: Vec<ValidationRequirement>,
}

impl ValidationRequirements {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement. Returns `false` when its type is already present.
    pub fn insert(&mut self, requirement: ValidationRequirement) -> bool {
        if self.items.contains(&requirement) {
            return false;
        }
        self.items.push(requirement);
        true
    }

    /// Whether a requirement for `T` is present.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.items.iter().any(|r| r.type_id == TypeId::of::<T>())
    }

    /// Requirements in order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationRequirement> {
        self.items.iter()
    }

    /// Number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are none.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<ValidationRequirement> for ValidationRequirements {
    fn extend<I: IntoIterator<Item = ValidationRequirement>>(&mut self, iter: I) {
        for requirement in iter {
            self.insert(requirement);
        }
    }
}

impl FromIterator<ValidationRequirement> for ValidationRequirements {
    fn from_iter<I: IntoIterator<Item = ValidationRequirement>>(iter: I) -> Self {
        let mut requirements = Self::new();
        requirements.extend(iter);
        requirements
    }
}
