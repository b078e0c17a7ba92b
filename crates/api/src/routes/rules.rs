use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

/// Posting rule routes mounted at `/rules`.
///
/// ```text
/// GET    /       -> list_rules
/// PUT    /       -> upsert_rule
/// DELETE /{id}   -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rules::list_rules).put(rules::upsert_rule))
        .route("/{id}", delete(rules::delete_rule))
}
