use axum::routing::post;
use axum::Router;

use crate::handlers::batch;
use crate::state::AppState;

/// Batch routes mounted at `/batch`.
///
/// ```text
/// POST /publish    -> publish_validated
/// POST /captions   -> generate_captions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publish", post(batch::publish_validated))
        .route("/captions", post(batch::generate_captions))
}
