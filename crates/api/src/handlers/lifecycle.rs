//! Handlers for single-entry status changes and manual media swaps.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use editoria_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a media swap.
#[derive(Debug, Deserialize)]
pub struct SwapMedia {
    pub media_id: DbId,
}

/// POST /api/v1/calendar/{id}/validate
pub async fn validate_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.validate(entry_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/calendar/{id}/skip
pub async fn skip_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.skip(entry_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/calendar/{id}/reset
///
/// Send an entry back to `generated` for rework.
pub async fn reset_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.reset(entry_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/calendar/{id}/mark-published
///
/// Record a post published outside the bridge.
pub async fn mark_published(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.mark_published(entry_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/calendar/{id}/media
///
/// Override the generated media with a manual choice.
pub async fn swap_media(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<SwapMedia>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.swap_media(entry_id, input.media_id).await?;
    Ok(Json(DataResponse { data: entry }))
}
