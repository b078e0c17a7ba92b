pub mod batch;
pub mod calendar;
pub mod health;
pub mod rules;
pub mod themes;

use axum::Router;

use crate::state::AppState;

/// Build the interactive part of the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rules                       list, upsert
/// /rules/{id}                  delete
///
/// /themes                      list, create
/// /themes/active               theme governing a date
/// /themes/{id}                 update, delete
///
/// /calendar                    list range, delete range
/// /calendar/counts             per-status counts
/// /calendar/preview            dry-run generation
/// /calendar/generate           generation run
/// /calendar/{id}               get entry
/// /calendar/{id}/...           lifecycle, media swap, content, publish
/// ```
///
/// `/batch` is mounted by the app router under its own timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/rules", rules::router())
        .nest("/themes", themes::router())
        .nest("/calendar", calendar::router())
}
