//! Pipeline Contract

use crate::encoder::FeatureVector;
use crate::{InferenceError, TransformError};
use feature_engine::{AssembledRecord, FeatureSchema};

/// A fitted encoder + regressor pair.
///
/// Implementations are immutable once loaded and are shared across request handlers.
pub trait Pipeline: Send + Sync {
    /// Columns the encoder was fit on
    fn schema(&self) -> &FeatureSchema;

    /// Apply the fitted encoder to one assembled record
    fn transform(&self, record: &AssembledRecord) -> Result<FeatureVector, TransformError>;

    /// Run the regressor; the output is hours to resolution
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}
