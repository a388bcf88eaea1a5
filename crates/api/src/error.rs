//! Request Boundary Errors

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::InvalidInputError;
use inference_engine::PredictionError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Errors turned into user-visible responses. None of these stop the server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed request: {0}")]
    MalformedBody(#[from] JsonRejection),
    #[error("Invalid input in {} field(s)", .0.len())]
    InvalidInput(Vec<InvalidInputError>),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// One rejected field
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<&'static [&'static str]>,
}

impl From<&InvalidInputError> for FieldError {
    fn from(err: &InvalidInputError) -> Self {
        Self {
            field: err.field(),
            message: err.to_string(),
            allowed: err.allowed(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InvalidInputBody {
    error: &'static str,
    fields: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    error: &'static str,
    cause: String,
}

fn invalid_input(errors: &[InvalidInputError]) -> Response {
    let body = InvalidInputBody {
        error: "Invalid input",
        fields: errors.iter().map(FieldError::from).collect(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedBody(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                let body = FailureBody {
                    error: "Malformed request",
                    cause: rejection.body_text(),
                };
                (rejection.status(), Json(body)).into_response()
            }
            ApiError::InvalidInput(errors) => invalid_input(&errors),
            ApiError::Prediction(PredictionError::InvalidInput(err)) => {
                invalid_input(std::slice::from_ref(&err))
            }
            ApiError::Prediction(err) => {
                error!("Prediction request failed: {}", err);
                let body = FailureBody {
                    error: "Prediction failed",
                    cause: err.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
