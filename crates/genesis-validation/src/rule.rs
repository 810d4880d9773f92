//! Rules and persistent rule sets.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use genesis_core::validator::{BoxFuture, ValidationResult, Validator};
use genesis_core::short_type_name;

use crate::error::RuleError;
use crate::outcome::{RuleSetValidationResult, ValidationOutcome};
use crate::property::Property;

type Check<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A single named check.
pub struct Rule<T> {
    property_name: Cow<'static, str>,
    check: Check<T>,
    message: Cow<'static, str>,
}

impl<T> Rule<T> {
    /// Name of the checked property.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Configured message, possibly empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message reported on failure. Falls back to `"{property} is invalid"`.
    pub fn failure_message(&self) -> String {
        if self.message.is_empty() {
            format!("{} is invalid", self.property_name)
        } else {
            self.message.to_string()
        }
    }

    /// Runs the check.
    pub fn check(&self, value: &T) -> bool {
        (self.check)(value)
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("property_name", &self.property_name)
            .field("message", &self.message)
            .finish()
    }
}

struct Link<T> {
    rule: Rule<T>,
    prev: Option<Arc<Link<T>>>,
}

/// An ordered, immutable set of rules for `T`.
///
/// Appending returns a new set that shares every existing rule with the
/// original.
pub struct RuleSet<T> {
    last: Option<Arc<Link<T>>>,
    len: usize,
}

impl<T> Clone for RuleSet<T> {
    fn clone(&self) -> Self {
        Self {
            last: self.last.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { last: None, len: 0 }
    }
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules()).finish()
    }
}

impl<T: 'static> RuleSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with a rule on `property` appended.
    pub fn rule_for<R, P>(
        &self,
        property: Property<T, R>,
        predicate: P,
        message: impl Into<Cow<'static, str>>,
    ) -> Self
    where
        R: 'static,
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let (name, select) = property.into_parts();
        let check: Check<T> = Arc::new(move |value: &T| predicate(&select(value)));
        self.append(Rule {
            property_name: name,
            check,
            message: message.into(),
        })
    }

    /// Returns a new set with a rule on the whole value appended.
    ///
    /// Fails when `T` is not a primitive scalar. The property name defaults
    /// to the short type name.
    pub fn primitive_rule_for<P>(
        &self,
        predicate: P,
        message: impl Into<Cow<'static, str>>,
        name: Option<&str>,
    ) -> Result<Self, RuleError>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        if !is_primitive::<T>() {
            return Err(RuleError::NotPrimitive {
                type_name: short_type_name::<T>().to_string(),
            });
        }
        let property_name = match name {
            Some(name) => Cow::Owned(name.to_string()),
            None => Cow::Borrowed(short_type_name::<T>()),
        };
        Ok(self.append(Rule {
            property_name,
            check: Arc::new(predicate),
            message: message.into(),
        }))
    }

    fn append(&self, rule: Rule<T>) -> Self {
        Self {
            last: Some(Arc::new(Link {
                rule,
                prev: self.last.clone(),
            })),
            len: self.len + 1,
        }
    }
}

impl<T> RuleSet<T> {
    /// Number of rules.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rules in registration order.
    pub fn rules(&self) -> Vec<&Rule<T>> {
        let mut rules = Vec::with_capacity(self.len);
        let mut cursor = self.last.as_deref();
        while let Some(link) = cursor {
            rules.push(&link.rule);
            cursor = link.prev.as_deref();
        }
        rules.reverse();
        rules
    }

    /// Evaluates every rule against `value`. Never stops early.
    pub fn validate<'a>(&self, value: &'a T) -> RuleSetValidationResult<'a, T> {
        let outcomes: Vec<_> = self
            .rules()
            .into_iter()
            .map(|rule| {
                if rule.check(value) {
                    ValidationOutcome::Success(value)
                } else {
                    ValidationOutcome::Failure {
                        property_name: rule.property_name().to_string(),
                        message: rule.failure_message(),
                    }
                }
            })
            .collect();
        let result = RuleSetValidationResult::new(outcomes);
        tracing::trace!(
            rules = self.len,
            failures = result.failures().count(),
            "rule set evaluated"
        );
        result
    }
}

/// Starts a rule set with one rule on `property`.
pub fn rule_for<T, R, P>(
    property: Property<T, R>,
    predicate: P,
    message: impl Into<Cow<'static, str>>,
) -> RuleSet<T>
where
    T: 'static,
    R: 'static,
    P: Fn(&R) -> bool + Send + Sync + 'static,
{
    RuleSet::new().rule_for(property, predicate, message)
}

/// Starts a rule set with one rule on a primitive value.
pub fn primitive_rule_for<T, P>(
    predicate: P,
    message: impl Into<Cow<'static, str>>,
    name: Option<&str>,
) -> Result<RuleSet<T>, RuleError>
where
    T: 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    RuleSet::new().primitive_rule_for(predicate, message, name)
}

/// True for `bool`, `char` and the built-in integer and float types.
pub fn is_primitive<T: ?Sized + 'static>() -> bool {
    let id = TypeId::of::<T>();
    [
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
    ]
    .contains(&id)
}

impl<T> Validator<T> for RuleSet<T> {
    fn validate<'a>(&'a self, value: &'a T) -> BoxFuture<'a, ValidationResult> {
        let result = RuleSet::validate(self, value).into_validation_result();
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct Message {
        content: String,
    }

    fn bounded() -> RuleSet<i32> {
        primitive_rule_for(|x: &i32| *x > 5, "Value must be greater than 5", None)
            .and_then(|set| set.primitive_rule_for(|x| *x < 10, "Value must be less than 10", None))
            .unwrap()
    }

    #[test]
    fn test_rule_for_success() {
        let set = rule_for(
            property!(Message => content),
            |content: &String| content.len() > 5,
            "Message must be longer than 5 characters",
        );
        let message = Message {
            content: "Hello World".into(),
        };
        assert!(set.validate(&message).is_valid());
    }

    #[test]
    fn test_primitive_bounds() {
        let set = bounded();
        for (value, expected) in [(4, false), (10, false), (6, true), (9, true)] {
            let result = set.validate(&value);
            assert_eq!(result.is_valid(), expected, "value {value}");
            if !expected {
                assert_eq!(result.failures().count(), 1, "value {value}");
            }
        }
    }

    #[test]
    fn test_primitive_name_defaults_to_type() {
        let set = bounded();
        let result = set.validate(&4);
        let failure = result.failures().next().unwrap();
        assert_eq!(failure, ("i32", "Value must be greater than 5"));
    }

    #[test]
    fn test_primitive_rejects_non_primitive() {
        let err = primitive_rule_for(
            |m: &Message| m.content.len() > 5,
            "Value must be greater than 5",
            None,
        )
        .unwrap_err();
        assert_eq!(err.param_name(), "Message");
    }

    #[test]
    fn test_strings_are_not_primitive() {
        assert!(!is_primitive::<String>());
        assert!(!is_primitive::<&'static str>());
        assert!(is_primitive::<u8>());
        assert!(is_primitive::<f64>());
    }

    #[test]
    fn test_empty_message_uses_default() {
        let set = rule_for(property!(Message => content), |c: &String| !c.is_empty(), "");
        let message = Message {
            content: String::new(),
        };
        let result = set.validate(&message);
        assert_eq!(
            result.failures().next().unwrap(),
            ("content", "content is invalid")
        );
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let one = rule_for(property!(Message => content), |c: &String| !c.is_empty(), "required");
        let two = one.rule_for(property!(Message => content), |c: &String| c.len() < 3, "too long");
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);

        let names: Vec<_> = two.rules().iter().map(|r| r.message().to_string()).collect();
        assert_eq!(names, ["required", "too long"]);
    }

    #[test]
    fn test_named_primitive() {
        let set = primitive_rule_for(|x: &u8| *x != 0, "", Some("Percent")).unwrap();
        let result = set.validate(&0);
        assert_eq!(
            result.failures().next().unwrap(),
            ("Percent", "Percent is invalid")
        );
    }

    #[tokio::test]
    async fn test_rule_set_as_validator() {
        let set = rule_for(property!(Message => content), |c: &String| !c.is_empty(), "required");
        let validator: &dyn Validator<Message> = &set;
        let result = validator
            .validate(&Message {
                content: String::new(),
            })
            .await;
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].property_name, "content");
    }

    proptest! {
        #[test]
        fn prop_one_outcome_per_rule(value in any::<i64>(), bounds in prop::collection::vec(any::<i64>(), 0..12)) {
            let mut set = RuleSet::<i64>::new();
            for bound in &bounds {
                let bound = *bound;
                set = set.primitive_rule_for(move |x| *x >= bound, "", None).unwrap();
            }

            let result = set.validate(&value);
            prop_assert_eq!(result.len(), bounds.len());

            for (outcome, bound) in result.outcomes().iter().zip(&bounds) {
                prop_assert_eq!(outcome.is_success(), value >= *bound);
            }
            prop_assert_eq!(result.is_valid(), bounds.iter().all(|b| value >= *b));
        }
    }
}
