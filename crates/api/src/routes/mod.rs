//! HTTP Routes

pub mod predictions;
pub mod schema;
