use std::sync::Arc;

use editoria_db::PgEditorialStore;
use editoria_engine::EditorialEngine;

use crate::bridge::{HttpCaptionGenerator, HttpPublisher};
use crate::config::ServerConfig;

/// The engine wired to PostgreSQL and the HTTP bridges.
pub type AppEngine = EditorialEngine<PgEditorialStore, HttpPublisher, HttpCaptionGenerator>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: editoria_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Scheduling engine shared by the calendar, content and publish handlers.
    pub engine: Arc<AppEngine>,
}
