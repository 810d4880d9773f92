//! Rule construction errors.

use thiserror::Error;

/// Errors raised while building a rule set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A primitive rule was requested for a type that is not a scalar.
    #[error("{type_name} is not a primitive type (Parameter '{type_name}')")]
    NotPrimitive {
        /// Short name of the offending type.
        type_name: String,
    },
}

impl RuleError {
    /// Name of the offending parameter.
    pub fn param_name(&self) -> &str {
        match self {
            Self::NotPrimitive { type_name } => type_name,
        }
    }
}
