//! Assembly Error Types

use crate::schema::ColumnKind;
use data_validator::InvalidInputError;
use thiserror::Error;

/// Errors while building the canonical column record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// Raw field rejected by validation
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// Schema column that is neither collected nor defaulted
    #[error("Required column {0:?} is not collected and has no default")]
    MissingColumn(String),

    /// Collected field or default whose type disagrees with the schema
    #[error("Column {column:?} is declared {expected:?} but is supplied as {actual:?}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// Column declared twice in the schema
    #[error("Column {0:?} is declared more than once")]
    DuplicateColumn(String),
}
