//! # Genesis Validation
//!
//! A small rule-based validation DSL.
//!
//! A [`RuleSet`] is an ordered list of `(property, predicate, message)` rules.
//! Validation runs every rule and reports one [`ValidationOutcome`] per rule.
//! Rule sets implement [`genesis_core::Validator`], so they can be registered
//! as the validator behind a validation filter.
//!
//! ```
//! use genesis_validation::{property, rule_for};
//!
//! struct Todo {
//!     title: String,
//!     priority: u8,
//! }
//!
//! let rules = rule_for(property!(Todo => title), |t: &String| !t.is_empty(), "Title is required")
//!     .rule_for(property!(Todo => priority), |p: &u8| *p <= 5, "");
//!
//! let todo = Todo { title: String::new(), priority: 9 };
//! let result = rules.validate(&todo);
//! assert!(!result.is_valid());
//! assert_eq!(
//!     result.failures().collect::<Vec<_>>(),
//!     [("title", "Title is required"), ("priority", "priority is invalid")]
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/genesis-validation/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod outcome;
mod property;
mod rule;

pub use error::RuleError;
pub use outcome::{RuleSetValidationResult, ValidationOutcome};
pub use property::{Property, UNNAMED_PROPERTY};
pub use rule::{is_primitive, primitive_rule_for, rule_for, Rule, RuleSet};
