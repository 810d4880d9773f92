//! Type naming helpers.

/// Returns the unqualified name of `T`, without module path or generics.
///
/// ```
/// use genesis_core::short_type_name;
///
/// struct EchoRequest;
///
/// assert_eq!(short_type_name::<EchoRequest>(), "EchoRequest");
/// assert_eq!(short_type_name::<String>(), "String");
/// assert_eq!(short_type_name::<Vec<EchoRequest>>(), "Vec");
/// assert_eq!(short_type_name::<i32>(), "i32");
/// ```
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
