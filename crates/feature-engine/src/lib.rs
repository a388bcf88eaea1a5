//! Feature Assembly
//!
//! Turns a validated incident into the ordered column record the trained pipeline was
//! fit on, filling uncollected columns from trained defaults.

mod assembler;
mod error;
mod schema;

pub use assembler::{AssembledRecord, FeatureAssembler};
pub use error::AssemblyError;
pub use schema::{ColumnKind, ColumnSpec, FeatureSchema, FieldValue, IncidentField};
