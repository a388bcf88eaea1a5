//! Prediction Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use data_validator::RawIncident;
use inference_engine::{PredictionResult, SeverityBand};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Estimate as rendered for the form
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub estimate_hours: f64,
    pub hours_part: u64,
    pub minutes_part: u8,
    /// `"{hours}h {minutes}m"`
    pub display: String,
    pub severity_band: SeverityBand,
    pub advisory: &'static str,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            estimate_hours: result.estimate_hours,
            hours_part: result.hours_part,
            minutes_part: result.minutes_part,
            display: result.display_time(),
            severity_band: result.severity_band,
            advisory: result.advisory(),
        }
    }
}

/// Estimate resolution time for one submitted incident
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawIncident>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(raw) = payload?;

    // Report every bad field in one response
    let assembled = state
        .service
        .assemble_incident(&raw)
        .map_err(ApiError::InvalidInput)?;
    let result = state.service.predict(&assembled)?;

    Ok(Json(result.into()))
}
