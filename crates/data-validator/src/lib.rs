//! Incident Input Validation
//!
//! Closed categorical domains, range checks and the typed incident record that every
//! later stage consumes.

mod domain;
mod error;
mod validator;

pub use domain::{AssignmentGroup, Category, CustomerScore, Domain, Priority};
pub use error::InvalidInputError;
pub use validator::{IncidentRecord, RawIncident, Validator};
