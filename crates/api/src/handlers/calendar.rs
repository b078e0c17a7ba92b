//! Handlers for calendar generation, listing and range deletion.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use editoria_core::calendar::GenerationRequest;
use editoria_core::types::DbId;

use crate::error::AppResult;
use crate::query::{CalendarListParams, DateRangeParams, LimitParams};
use crate::response::{DataResponse, DeletedCount};
use crate::state::AppState;

/// POST /api/v1/calendar/preview
///
/// Compute the entries a generation run would write, without writing.
pub async fn preview_calendar(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let entries = state.engine.plan(&request).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/calendar/generate
///
/// Fill `[start, end]` from the weekly rules. With `overwrite = false`
/// existing slots are left alone.
pub async fn generate_calendar(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine.generate(&request).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/calendar?start=&end=&status=
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<CalendarListParams>,
) -> AppResult<impl IntoResponse> {
    let entries = state
        .engine
        .list(params.start, params.end, params.status)
        .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/calendar/counts?start=&end=
///
/// Number of entries per status, every status present.
pub async fn status_counts(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let counts = state.engine.status_counts(params.start, params.end).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// DELETE /api/v1/calendar?start=&end=
pub async fn delete_range(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.engine.delete_range(params.start, params.end).await?;
    Ok(Json(DataResponse {
        data: DeletedCount { deleted },
    }))
}

/// GET /api/v1/calendar/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = state.engine.get_entry(entry_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/calendar/{id}/suggestions?limit=
///
/// Ranked replacement media for the entry's slot.
pub async fn suggest_media(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let suggestions = state.engine.suggest_media(entry_id, params.limit).await?;
    Ok(Json(DataResponse { data: suggestions }))
}
