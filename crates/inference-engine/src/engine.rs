//! Prediction Service

use crate::artifact::LoadedPipeline;
use crate::pipeline::Pipeline;
use crate::result::PredictionResult;
use crate::{InferenceError, PipelineLoadError, PredictionError};
use data_validator::{InvalidInputError, RawIncident, Validator};
use feature_engine::{AssembledRecord, FeatureAssembler, FeatureSchema};
use metrics::{counter, histogram};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Owns the loaded pipeline. A service only exists once its pipeline has loaded;
/// a failed load never produces one.
pub struct PredictionService {
    pipeline: Arc<dyn Pipeline>,
    assembler: FeatureAssembler,
    validator: Validator,
}

impl PredictionService {
    /// Wrap an already-loaded pipeline
    pub fn new(pipeline: Arc<dyn Pipeline>) -> Result<Self, PipelineLoadError> {
        let assembler = FeatureAssembler::new(pipeline.schema())?;
        Ok(Self {
            pipeline,
            assembler,
            validator: Validator::new(),
        })
    }

    /// Load the artifact at `path`. Called once at process startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineLoadError> {
        let path = path.as_ref();
        let start = Instant::now();

        let service = LoadedPipeline::load(path)
            .and_then(|pipeline| Self::new(Arc::new(pipeline)));

        match &service {
            Ok(_) => info!(
                "Pipeline state: LOADED from {} in {}ms",
                path.display(),
                start.elapsed().as_millis()
            ),
            Err(e) => error!("Pipeline state: LOAD_FAILED for {}: {}", path.display(), e),
        }
        service
    }

    /// Columns the loaded pipeline was fit on
    pub fn schema(&self) -> &FeatureSchema {
        self.pipeline.schema()
    }

    /// Transform, infer and derive the result for one assembled record
    pub fn predict(&self, record: &AssembledRecord) -> Result<PredictionResult, PredictionError> {
        let start = Instant::now();
        let outcome = self.run(record);
        histogram!("prediction_latency_seconds").record(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(result) => {
                counter!("predictions_total").increment(1);
                histogram!("predicted_resolution_hours").record(result.estimate_hours);
                debug!(
                    "Prediction: {} ({}, estimate={:.3}h)",
                    result,
                    result.severity_band.as_str(),
                    result.estimate_hours
                );
            }
            Err(e) => {
                counter!("prediction_failures_total", "stage" => e.stage()).increment(1);
                warn!("Prediction failed at {} stage: {}", e.stage(), e);
            }
        }
        outcome
    }

    /// Validate every field and assemble the record, reporting all rejected fields
    pub fn assemble_incident(
        &self,
        raw: &RawIncident,
    ) -> Result<AssembledRecord, Vec<InvalidInputError>> {
        match self.validator.validate_all(raw) {
            Ok(record) => Ok(self.assembler.assemble(&record)),
            Err(errors) => {
                record_rejection(&errors);
                Err(errors)
            }
        }
    }

    /// Validate and assemble raw form fields, then predict
    pub fn predict_incident(&self, raw: &RawIncident) -> Result<PredictionResult, PredictionError> {
        let record = self.validator.validate(raw).map_err(|e| {
            record_rejection(std::slice::from_ref(&e));
            e
        })?;
        self.predict(&self.assembler.assemble(&record))
    }

    fn run(&self, record: &AssembledRecord) -> Result<PredictionResult, PredictionError> {
        let features = self.pipeline.transform(record)?;
        let estimate = self.pipeline.predict(&features)?;

        if !estimate.is_finite() {
            return Err(InferenceError::NonFinite(estimate).into());
        }
        if estimate < 0.0 {
            warn!("Model returned negative estimate {:.3}h, clamping to zero", estimate);
        }

        Ok(PredictionResult::from_estimate(estimate))
    }
}

fn record_rejection(errors: &[InvalidInputError]) {
    counter!("prediction_failures_total", "stage" => "input").increment(1);
    for e in errors {
        debug!("Rejected incident input: {}", e);
    }
}
