//! Named property selectors.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Marker used when a selector has no recognizable member name.
pub const UNNAMED_PROPERTY: &str = "''";

/// Selects a value of type `R` from a `T` and carries the property name used
/// in failure messages.
///
/// Build one with the [`property!`](crate::property!) macro to get the name
/// from the accessed member, or with [`Property::named`].
pub struct Property<T, R> {
    name: Cow<'static, str>,
    select: Arc<dyn Fn(&T) -> R + Send + Sync>,
}

impl<T: 'static, R: 'static> Property<T, R> {
    /// Creates a property with an explicit name.
    pub fn named<F>(name: impl Into<Cow<'static, str>>, select: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            select: Arc::new(select),
        }
    }

    /// Creates a property whose name cannot be derived. It is reported as
    /// [`UNNAMED_PROPERTY`].
    pub fn unnamed<F>(select: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self::named(UNNAMED_PROPERTY, select)
    }
}

impl<T, R> Property<T, R> {
    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the selector.
    pub fn select(&self, value: &T) -> R {
        (self.select)(value)
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Arc<dyn Fn(&T) -> R + Send + Sync>) {
        (self.name, self.select)
    }
}

impl<T, R> Clone for Property<T, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            select: Arc::clone(&self.select),
        }
    }
}

impl<T, R> fmt::Debug for Property<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

/// Builds a [`Property`] from a member access, naming it after the last
/// accessed member.
///
/// ```
/// use genesis_validation::property;
///
/// struct Address {
///     city: String,
/// }
///
/// struct Customer {
///     name: String,
///     address: Address,
/// }
///
/// let name = property!(Customer => name);
/// let city = property!(Customer => address.city);
/// assert_eq!(name.name(), "name");
/// assert_eq!(city.name(), "city");
///
/// let customer = Customer {
///     name: "Ada".into(),
///     address: Address { city: "London".into() },
/// };
/// assert_eq!(city.select(&customer), "London");
/// ```
#[macro_export]
macro_rules! property {
    ($ty:ty => $($member:ident).+) => {
        $crate::Property::<$ty, _>::named(
            $crate::__last_member!($($member).+),
            |value: &$ty| ::core::clone::Clone::clone(&value.$($member).+),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __last_member {
    ($last:ident) => {
        ::core::stringify!($last)
    };
    ($first:ident . $($rest:ident).+) => {
        $crate::__last_member!($($rest).+)
    };
}
