//! Handlers for caption content and single-entry publishing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use editoria_core::content::{CaptionSet, CaptionUsage, NewContent};
use editoria_core::publishing::PublishOptions;
use editoria_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Captions written outside the caption service.
#[derive(Debug, Deserialize)]
pub struct AttachContent {
    /// Defaults to the entry's effective media.
    pub media_id: Option<DbId>,
    pub captions: CaptionSet,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub usage: CaptionUsage,
    #[serde(default)]
    pub generation_params: serde_json::Value,
}

/// Body of a caption generation request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateCaption {
    /// Replaces the theme's call to action.
    pub cta: Option<String>,
}

/// POST /api/v1/calendar/{id}/content
pub async fn attach_content(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<AttachContent>,
) -> AppResult<impl IntoResponse> {
    let media_id = match input.media_id {
        Some(id) => Some(id),
        None => state.engine.get_entry(entry_id).await?.effective_media_id(),
    };
    let content = NewContent {
        calendar_id: entry_id,
        media_id,
        captions: input.captions,
        hashtags: input.hashtags,
        usage: input.usage,
        generation_params: input.generation_params,
    };

    let attached = state.engine.attach_content(entry_id, content).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attached })))
}

/// POST /api/v1/calendar/{id}/caption
///
/// Generate captions with the caption service and attach them.
pub async fn generate_caption(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<GenerateCaption>,
) -> AppResult<impl IntoResponse> {
    let attached = state
        .engine
        .generate_caption(entry_id, input.cta.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attached })))
}

/// POST /api/v1/calendar/{id}/publish
///
/// Hand a validated entry to the publishing bridge. A bridge failure is
/// recorded on the entry and reported with `success = false`.
pub async fn publish_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(options): Json<PublishOptions>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.publish_entry(entry_id, &options).await?;
    Ok(Json(DataResponse { data: outcome }))
}
