//! Form Schema Route

use axum::{extract::State, Json};
use data_validator::{AssignmentGroup, Category, CustomerScore, Domain, Priority};
use feature_engine::ColumnSpec;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

/// Allowed form values plus the columns the loaded pipeline expects
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub category: &'static [&'static str],
    pub priority: &'static [&'static str],
    pub assignment_group: &'static [&'static str],
    pub customer_score: ScoreRange,
    pub columns: Vec<ColumnSpec>,
}

pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        category: Category::LABELS,
        priority: Priority::LABELS,
        assignment_group: AssignmentGroup::LABELS,
        customer_score: ScoreRange {
            min: CustomerScore::MIN,
            max: CustomerScore::MAX,
        },
        columns: state.service.schema().columns().to_vec(),
    })
}
