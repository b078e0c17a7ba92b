use axum::routing::{get, put};
use axum::Router;

use crate::handlers::themes;
use crate::state::AppState;

/// Seasonal theme routes mounted at `/themes`.
///
/// ```text
/// GET    /          -> list_themes
/// POST   /          -> create_theme
/// GET    /active    -> active_theme (?date=)
/// PUT    /{id}      -> update_theme
/// DELETE /{id}      -> delete_theme
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(themes::list_themes).post(themes::create_theme))
        .route("/active", get(themes::active_theme))
        .route("/{id}", put(themes::update_theme).delete(themes::delete_theme))
}
