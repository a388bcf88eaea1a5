//! Validation Error Types

use thiserror::Error;

/// Caller-correctable input errors. Each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// Categorical value outside its declared domain
    #[error("{field} value {value:?} is not allowed; expected one of [{}]", .allowed.join(", "))]
    UnknownValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Integer value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl InvalidInputError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            InvalidInputError::UnknownValue { field, .. } => *field,
            InvalidInputError::OutOfRange { field, .. } => *field,
        }
    }

    /// Allowed labels, when the field has a closed domain
    pub fn allowed(&self) -> Option<&'static [&'static str]> {
        match self {
            InvalidInputError::UnknownValue { allowed, .. } => Some(*allowed),
            InvalidInputError::OutOfRange { .. } => None,
        }
    }
}
