//! Router behaviour that does not need a live database.
//!
//! The pool points at a closed port, so anything reaching the store
//! reports the database as unavailable.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, build_test_app, build_test_app_with, get, post_json, send, test_config,
    unreachable_pool, unreachable_pool_with_timeout,
};
use editoria_api::config::ServerConfig;
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Health and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
    assert_eq!(json["upstream"]["publish_bridge"], "http://127.0.0.1:9");
    assert_eq!(json["upstream"]["caption_service"], "http://127.0.0.1:9");
    assert_eq!(json["scheduling"]["recency_lookback_days"], 7);
    assert_eq!(json["scheduling"]["batch_delay_ms"], 0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = build_test_app(unreachable_pool());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/calendar")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert!(headers.get("access-control-allow-credentials").is_none());
    let allowed = headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert_eq!(allowed, "content-type");
}

// ---------------------------------------------------------------------------
// Validation happens before the store is touched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inverted_generation_range_is_a_validation_error() {
    let app = build_test_app(unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/calendar/generate",
        json!({ "start": "2026-03-09", "end": "2026-03-02", "overwrite": false }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn inverted_list_range_is_a_validation_error() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/calendar?start=2026-03-09&end=2026-03-02").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = get(
        app,
        "/api/v1/calendar?start=2026-03-02&end=2026-03-09&status=archived",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_rule_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = send(
        app,
        Method::PUT,
        "/api/v1/rules",
        Some(json!({ "day_of_week": 8, "slot_index": 1 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn theme_with_end_before_start_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/themes",
        json!({ "theme_name": "Autumn", "start_date": "2026-10-31", "end_date": "2026-10-01" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_database_maps_to_503() {
    let app = build_test_app(unreachable_pool());
    let response = get(app, "/api/v1/calendar/1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["error"], "The database is unavailable");
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

/// The pool keeps retrying the refused connection for 2.5s, longer than
/// the 1s request timeout.
fn slow_store_app(config: ServerConfig) -> axum::Router {
    build_test_app_with(
        unreachable_pool_with_timeout(Duration::from_millis(2500)),
        config,
    )
}

#[tokio::test]
async fn interactive_routes_use_the_request_timeout() {
    let app = slow_store_app(ServerConfig {
        request_timeout_secs: 1,
        batch_timeout_secs: 30,
        ..test_config()
    });

    let response = get(app, "/api/v1/calendar/1").await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn batch_runs_outlive_the_request_timeout() {
    let app = slow_store_app(ServerConfig {
        request_timeout_secs: 1,
        batch_timeout_secs: 30,
        ..test_config()
    });

    let response = post_json(
        app,
        "/api/v1/batch/publish",
        json!({ "start": "2026-03-02", "end": "2026-03-08" }),
    )
    .await;

    // The run reaches the store and reports the outage instead of a 408.
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn batch_runs_have_their_own_timeout() {
    let app = slow_store_app(ServerConfig {
        request_timeout_secs: 30,
        batch_timeout_secs: 1,
        ..test_config()
    });

    let response = post_json(
        app,
        "/api/v1/batch/captions",
        json!({ "start": "2026-03-02", "end": "2026-03-08" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}
