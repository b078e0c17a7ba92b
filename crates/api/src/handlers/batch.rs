//! Handlers for sequential batch runs over a date range.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use editoria_core::publishing::PublishOptions;
use editoria_core::types::Date;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a batch publish run.
#[derive(Debug, Deserialize)]
pub struct BatchPublish {
    pub start: Date,
    pub end: Date,
    #[serde(flatten)]
    pub options: PublishOptions,
}

/// Body of a batch caption run.
#[derive(Debug, Deserialize)]
pub struct BatchCaptions {
    pub start: Date,
    pub end: Date,
    pub cta: Option<String>,
}

/// POST /api/v1/batch/publish
///
/// Publish every validated entry in the range, one at a time.
pub async fn publish_validated(
    State(state): State<AppState>,
    Json(input): Json<BatchPublish>,
) -> AppResult<impl IntoResponse> {
    let summary = state
        .engine
        .publish_validated(input.start, input.end, &input.options)
        .await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/batch/captions
///
/// Generate captions for entries in the range that have media but no content.
pub async fn generate_captions(
    State(state): State<AppState>,
    Json(input): Json<BatchCaptions>,
) -> AppResult<impl IntoResponse> {
    let summary = state
        .engine
        .generate_captions(input.start, input.end, input.cta.as_deref())
        .await?;
    Ok(Json(DataResponse { data: summary }))
}
