use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the calendar store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub upstream: UpstreamServices,
    pub scheduling: SchedulingSettings,
}

/// Where publishing and caption requests are sent.
#[derive(Serialize)]
pub struct UpstreamServices {
    pub publish_bridge: String,
    pub caption_service: String,
}

/// Tunables the engine is running with.
#[derive(Serialize)]
pub struct SchedulingSettings {
    pub recency_lookback_days: i64,
    pub batch_delay_ms: u64,
    pub batch_timeout_secs: u64,
}

/// GET /health
///
/// Upstream services are listed by address; no request is sent to them.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = editoria_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check: calendar store unreachable");
    }

    let config = &state.config;
    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        upstream: UpstreamServices {
            publish_bridge: config.publish_bridge_url.clone(),
            caption_service: config.caption_service_url.clone(),
        },
        scheduling: SchedulingSettings {
            recency_lookback_days: config.recency_lookback_days,
            batch_delay_ms: config.batch_delay_ms,
            batch_timeout_secs: config.batch_timeout_secs,
        },
    })
}

/// Health routes, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
