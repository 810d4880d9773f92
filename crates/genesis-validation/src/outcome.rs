//! Per-rule outcomes.

use genesis_core::validator::{ValidationFailure, ValidationResult};

/// Result of one rule against one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<'a, T> {
    /// The rule passed.
    Success(&'a T),
    /// The rule failed.
    Failure {
        /// Name of the checked property
        property_name: String,
        /// Failure message
        message: String,
    },
}

impl<T> ValidationOutcome<'_, T> {
    /// True for [`ValidationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// All outcomes of a rule set, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetValidationResult<'a, T> {
    outcomes: Vec<ValidationOutcome<'a, T>>,
}

impl<'a, T> RuleSetValidationResult<'a, T> {
    pub(crate) fn new(outcomes: Vec<ValidationOutcome<'a, T>>) -> Self {
        Self { outcomes }
    }

    /// True when every rule passed.
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(ValidationOutcome::is_success)
    }

    /// One outcome per rule.
    pub fn outcomes(&self) -> &[ValidationOutcome<'a, T>] {
        &self.outcomes
    }

    /// `(property, message)` of each failed rule.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ValidationOutcome::Success(_) => None,
            ValidationOutcome::Failure {
                property_name,
                message,
            } => Some((property_name.as_str(), message.as_str())),
        })
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True for an empty rule set.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Converts to the validator contract's result.
    pub fn into_validation_result(self) -> ValidationResult {
        ValidationResult::from_failures(
            self.failures()
                .map(|(property, message)| ValidationFailure::new(property, message)),
        )
    }
}
