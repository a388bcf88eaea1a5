//! Pipeline Artifact Loading
//!
//! Collected form fields keep a fixed column kind: `Customer Score` is numeric, so it
//! can be scaled but not one-hot encoded. Text fields feed `bag_of_words` and the
//! closed domains feed `one_hot`. A schema that declares another kind for a collected
//! column is rejected when the prediction service is built.

use crate::encoder::{ColumnTransform, FeatureVector, FittedEncoder};
use crate::pipeline::Pipeline;
use crate::regressor::{Regressor, RegressorSpec};
use crate::{InferenceError, PipelineLoadError, TransformError};
use data_validator::{AssignmentGroup, Category, Domain, Priority};
use feature_engine::{AssembledRecord, FeatureSchema, IncidentField};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Well-known artifact location, relative to the working directory
pub const DEFAULT_PIPELINE_PATH: &str = "models/incident_pipeline.json";

/// Serialized pipeline, as produced by the training job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Columns the pipeline was fit on, with defaults for uncollected ones
    pub schema: FeatureSchema,
    /// Column transforms, applied in order
    pub encoder: FittedEncoder,
    pub regressor: RegressorSpec,
}

impl PipelineArtifact {
    pub fn from_json(json: &str) -> Result<Self, PipelineLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read an artifact file
    pub fn read(path: &Path) -> Result<Self, PipelineLoadError> {
        let json = fs::read_to_string(path).map_err(|source| PipelineLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes of pipeline artifact", json.len());
        Self::from_json(&json)
    }

    /// Check internal consistency and build the runnable pipeline
    pub fn into_pipeline(self) -> Result<LoadedPipeline, PipelineLoadError> {
        for transform in self.encoder.transforms() {
            let column = self.schema.column(transform.column()).ok_or_else(|| {
                PipelineLoadError::Invalid(format!(
                    "encoder column {:?} is not in the schema",
                    transform.column()
                ))
            })?;
            if column.kind != transform.input_kind() {
                return Err(PipelineLoadError::Invalid(format!(
                    "encoder expects {:?} for column {:?}, schema declares {:?}",
                    transform.input_kind(),
                    column.name,
                    column.kind
                )));
            }
            warn_on_domain_gaps(transform);
        }

        let regressor = Regressor::from_spec(self.regressor)?;
        if regressor.n_features() != self.encoder.output_width() {
            return Err(PipelineLoadError::Invalid(format!(
                "encoder produces {} features, {} regressor expects {}",
                self.encoder.output_width(),
                regressor.kind(),
                regressor.n_features()
            )));
        }

        info!(
            "Pipeline ready: {} columns, {} features, {} regressor",
            self.schema.len(),
            self.encoder.output_width(),
            regressor.kind()
        );

        Ok(LoadedPipeline {
            schema: self.schema,
            encoder: self.encoder,
            regressor,
        })
    }
}

/// Form labels the encoder was never fit on will fail every request that uses them
fn warn_on_domain_gaps(transform: &ColumnTransform) {
    let ColumnTransform::OneHot { column, categories } = transform else {
        return;
    };
    let labels = match IncidentField::from_column(column) {
        Some(IncidentField::Category) => Category::LABELS,
        Some(IncidentField::Priority) => Priority::LABELS,
        Some(IncidentField::AssignmentGroup) => AssignmentGroup::LABELS,
        _ => return,
    };
    for label in labels {
        if !categories.iter().any(|category| category == label) {
            warn!("Encoder for {:?} was not fit on form value {:?}", column, label);
        }
    }
}

/// Pipeline loaded from an artifact
#[derive(Debug)]
pub struct LoadedPipeline {
    schema: FeatureSchema,
    encoder: FittedEncoder,
    regressor: Regressor,
}

impl LoadedPipeline {
    /// Read, validate and prepare the artifact at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineLoadError> {
        let path = path.as_ref();
        info!("Loading pipeline artifact from {}", path.display());
        PipelineArtifact::read(path)?.into_pipeline()
    }

    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }
}

impl Pipeline for LoadedPipeline {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn transform(&self, record: &AssembledRecord) -> Result<FeatureVector, TransformError> {
        self.encoder.transform(record)
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.regressor.predict(features.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FieldValue;

    const SMALL_ARTIFACT: &str = r#"{
        "schema": [
            {"name": "Priority", "kind": "categorical"},
            {"name": "Customer Score", "kind": "numeric"},
            {"name": "Reopen Count", "kind": "numeric", "default": 0}
        ],
        "encoder": [
            {"kind": "one_hot", "column": "Priority", "categories": ["Low", "Medium", "High", "Critical"]},
            {"kind": "scale", "column": "Customer Score", "mean": 3.0, "scale": 1.0}
        ],
        "regressor": {"kind": "linear", "intercept": 2.0, "coefficients": [0.0, 1.0, 2.0, 4.0, -0.5]}
    }"#;

    fn shipped_artifact_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models/incident_pipeline.json")
    }

    #[test]
    fn test_small_artifact_predicts() {
        let pipeline = PipelineArtifact::from_json(SMALL_ARTIFACT)
            .unwrap()
            .into_pipeline()
            .unwrap();
        let record = AssembledRecord::from_columns(vec![
            ("Priority".into(), FieldValue::Text("Critical".into())),
            ("Customer Score".into(), FieldValue::Integer(1)),
            ("Reopen Count".into(), FieldValue::Integer(0)),
        ]);
        let features = pipeline.transform(&record).unwrap();
        assert_eq!(features.len(), 5);
        assert_eq!(pipeline.predict(&features).unwrap(), 7.0);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let json = SMALL_ARTIFACT.replace("[0.0, 1.0, 2.0, 4.0, -0.5]", "[1.0, 2.0]");
        let err = PipelineArtifact::from_json(&json)
            .unwrap()
            .into_pipeline()
            .unwrap_err();
        assert!(matches!(err, PipelineLoadError::Invalid(_)));
    }

    #[test]
    fn test_encoder_column_outside_schema_rejected() {
        let json = SMALL_ARTIFACT.replace(
            r#""column": "Customer Score", "mean""#,
            r#""column": "Satisfaction", "mean""#,
        );
        let err = PipelineArtifact::from_json(&json)
            .unwrap()
            .into_pipeline()
            .unwrap_err();
        assert!(err.to_string().contains("Satisfaction"));
    }

    #[test]
    fn test_encoder_kind_must_match_schema() {
        let json = SMALL_ARTIFACT.replace(
            r#"{"name": "Customer Score", "kind": "numeric"}"#,
            r#"{"name": "Customer Score", "kind": "text"}"#,
        );
        let err = PipelineArtifact::from_json(&json)
            .unwrap()
            .into_pipeline()
            .unwrap_err();
        assert!(matches!(err, PipelineLoadError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = PipelineArtifact::from_json("{\"schema\": ").unwrap_err();
        assert!(matches!(err, PipelineLoadError::Parse(_)));
    }

    #[test]
    fn test_duplicate_vocabulary_is_parse_error() {
        let json = SMALL_ARTIFACT.replace(r#""Medium", "High""#, r#""High", "High""#);
        let err = PipelineArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, PipelineLoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = LoadedPipeline::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, PipelineLoadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_shipped_artifact_loads() {
        let pipeline = LoadedPipeline::load(shipped_artifact_path()).unwrap();
        assert_eq!(pipeline.regressor().kind(), "linear");
        assert!(pipeline.schema().column("Work Notes").is_some());
    }
}
