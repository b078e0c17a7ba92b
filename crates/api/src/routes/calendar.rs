use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{calendar, content, lifecycle};
use crate::state::AppState;

/// Calendar routes mounted at `/calendar`.
///
/// ```text
/// GET    /                      -> list_entries (?start=&end=&status=)
/// DELETE /                      -> delete_range (?start=&end=)
/// GET    /counts                -> status_counts (?start=&end=)
/// POST   /preview               -> preview_calendar
/// POST   /generate              -> generate_calendar
/// GET    /{id}                  -> get_entry
/// GET    /{id}/suggestions      -> suggest_media (?limit=)
/// POST   /{id}/validate         -> validate_entry
/// POST   /{id}/skip             -> skip_entry
/// POST   /{id}/reset            -> reset_entry
/// POST   /{id}/mark-published   -> mark_published
/// PUT    /{id}/media            -> swap_media
/// POST   /{id}/content          -> attach_content
/// POST   /{id}/caption          -> generate_caption
/// POST   /{id}/publish          -> publish_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar::list_entries).delete(calendar::delete_range))
        .route("/counts", get(calendar::status_counts))
        .route("/preview", post(calendar::preview_calendar))
        .route("/generate", post(calendar::generate_calendar))
        .route("/{id}", get(calendar::get_entry))
        .route("/{id}/suggestions", get(calendar::suggest_media))
        .route("/{id}/validate", post(lifecycle::validate_entry))
        .route("/{id}/skip", post(lifecycle::skip_entry))
        .route("/{id}/reset", post(lifecycle::reset_entry))
        .route("/{id}/mark-published", post(lifecycle::mark_published))
        .route("/{id}/media", put(lifecycle::swap_media))
        .route("/{id}/content", post(content::attach_content))
        .route("/{id}/caption", post(content::generate_caption))
        .route("/{id}/publish", post(content::publish_entry))
}
