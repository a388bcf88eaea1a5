//! Resolution-Time Prediction
//!
//! Owns the loaded pipeline artifact (fitted encoder + regressor), applies it to
//! assembled incident records and derives the user-facing time breakdown.

mod artifact;
mod encoder;
mod engine;
mod onnx;
mod pipeline;
mod regressor;
mod result;

pub use artifact::{LoadedPipeline, PipelineArtifact, DEFAULT_PIPELINE_PATH};
pub use encoder::{ColumnTransform, FeatureVector, FittedEncoder};
pub use engine::PredictionService;
pub use pipeline::Pipeline;
pub use regressor::{Aggregation, Regressor, RegressorSpec, Tree, TreeNode};
pub use result::{PredictionResult, SeverityBand};

use data_validator::InvalidInputError;
use feature_engine::AssemblyError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading the pipeline artifact. Fatal at startup.
#[derive(Debug, Error)]
pub enum PipelineLoadError {
    #[error("Failed to read pipeline artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed pipeline artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Inconsistent pipeline artifact: {0}")]
    Invalid(String),
    #[error("Pipeline schema cannot be assembled: {0}")]
    Schema(#[from] AssemblyError),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
}

/// Errors while applying the fitted encoder to a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Column {0:?} is missing from the record")]
    MissingColumn(String),
    #[error("Column {column:?} has category {value:?} the encoder was never fit on")]
    UnknownCategory { column: String, value: String },
    #[error("Column {column:?} expects a {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },
}

/// Errors during model inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Model produced no output")]
    EmptyOutput,
    #[error("Model produced non-finite estimate {0}")]
    NonFinite(f64),
}

/// Per-request prediction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error("Prediction failed: {0}")]
    Transform(#[from] TransformError),
    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),
}

impl PredictionError {
    /// Pipeline stage that failed, used as a metrics label
    pub fn stage(&self) -> &'static str {
        match self {
            PredictionError::InvalidInput(_) => "input",
            PredictionError::Transform(_) => "transform",
            PredictionError::Inference(_) => "inference",
        }
    }
}
