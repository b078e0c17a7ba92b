//! Handlers for seasonal themes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use editoria_core::error::CoreError;
use editoria_core::ports::ThemeSource;
use editoria_core::themes::SeasonalTheme;
use editoria_core::types::DbId;
use editoria_db::models::theme::{CreateTheme, UpdateTheme};
use editoria_db::repositories::ThemeRepo;

use crate::error::{AppError, AppResult};
use crate::query::DateParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn theme_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SeasonalTheme",
        id,
    })
}

/// GET /api/v1/themes
///
/// List all themes ordered by start date.
pub async fn list_themes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let themes = ThemeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// POST /api/v1/themes
pub async fn create_theme(
    State(state): State<AppState>,
    Json(input): Json<CreateTheme>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let theme = ThemeRepo::create(&state.pool, &input).await?;

    tracing::info!(
        theme_id = theme.id,
        theme_name = %theme.theme_name,
        start_date = %theme.start_date,
        end_date = %theme.end_date,
        "Seasonal theme created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: theme })))
}

/// PUT /api/v1/themes/{id}
///
/// Partially update a theme. The patched theme must still validate.
pub async fn update_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<DbId>,
    Json(input): Json<UpdateTheme>,
) -> AppResult<impl IntoResponse> {
    let current = ThemeRepo::find_by_id(&state.pool, theme_id)
        .await?
        .ok_or_else(|| theme_not_found(theme_id))?;
    input.validate_against(&SeasonalTheme::try_from(current)?)?;

    let theme = ThemeRepo::update(&state.pool, theme_id, &input)
        .await?
        .ok_or_else(|| theme_not_found(theme_id))?;

    tracing::info!(theme_id, "Seasonal theme updated");
    Ok(Json(DataResponse { data: theme }))
}

/// DELETE /api/v1/themes/{id}
///
/// Calendar entries keep their theme name snapshot.
pub async fn delete_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ThemeRepo::delete(&state.pool, theme_id).await? {
        return Err(theme_not_found(theme_id));
    }

    tracing::info!(theme_id, "Seasonal theme deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/themes/active?date=YYYY-MM-DD
///
/// The theme governing `date`, or `null` when none does.
pub async fn active_theme(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let theme = state
        .engine
        .store()
        .resolve_active_theme(params.date)
        .await?;
    Ok(Json(DataResponse { data: theme }))
}
