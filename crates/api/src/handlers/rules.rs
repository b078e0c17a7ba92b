//! Handlers for the weekly posting rules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use editoria_core::error::CoreError;
use editoria_core::types::DbId;
use editoria_db::models::rule::UpsertRule;
use editoria_db::repositories::RuleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rules
///
/// List every rule, active or not, ordered by day then slot.
pub async fn list_rules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rules = RuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// PUT /api/v1/rules
///
/// Insert or replace the rule at `(day_of_week, slot_index)`.
pub async fn upsert_rule(
    State(state): State<AppState>,
    Json(input): Json<UpsertRule>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let rule = RuleRepo::upsert(&state.pool, &input).await?;

    tracing::info!(
        rule_id = rule.id,
        day_of_week = rule.day_of_week,
        slot_index = rule.slot_index,
        "Posting rule saved",
    );

    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/rules/{id}
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RuleRepo::delete(&state.pool, rule_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PostingRule",
            id: rule_id,
        }));
    }

    tracing::info!(rule_id, "Posting rule deleted");
    Ok(StatusCode::NO_CONTENT)
}
