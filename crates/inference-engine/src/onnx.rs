//! ONNX Regressor (tract)

use crate::InferenceError;
use std::fmt;
use std::io::Cursor;
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Optimized ONNX plan with a fixed `[1, n_features]` input
pub struct OnnxRegressor {
    plan: OnnxPlan,
    n_features: usize,
}

impl OnnxRegressor {
    /// Parse and optimize an in-memory ONNX model
    pub fn from_bytes(bytes: &[u8], n_features: usize) -> TractResult<Self> {
        let plan = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(bytes))?
            .with_input_fact(0, f32::fact([1, n_features]).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { plan, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Run the graph and take the first element of the first output
    pub fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let values: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[1, self.n_features], &values)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs.first().ok_or(InferenceError::EmptyOutput)?;
        let output = output
            .cast_to::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let values = output
            .as_slice::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        values
            .first()
            .map(|&v| v as f64)
            .ok_or(InferenceError::EmptyOutput)
    }
}

impl fmt::Debug for OnnxRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxRegressor")
            .field("n_features", &self.n_features)
            .finish()
    }
}
