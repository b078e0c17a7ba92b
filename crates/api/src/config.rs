use editoria_core::config::EngineConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Not applied to
    /// batch routes.
    pub request_timeout_secs: u64,
    /// Timeout for a whole batch run in seconds (default: `3600`).
    pub batch_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the publishing bridge.
    pub publish_bridge_url: String,
    /// Base URL of the caption generation service.
    pub caption_service_url: String,
    /// Recency window for media reuse, in days (default: `7`).
    pub recency_lookback_days: i64,
    /// Pause between batch items, in milliseconds (default: `2000`).
    pub batch_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `BATCH_TIMEOUT_SECS`    | `3600`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLISH_BRIDGE_URL`    | `http://localhost:8100`    |
    /// | `CAPTION_SERVICE_URL`   | `http://localhost:8200`    |
    /// | `RECENCY_LOOKBACK_DAYS` | `7`                        |
    /// | `BATCH_DELAY_MS`        | `2000`                     |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Panics on unparseable values: misconfiguration should fail at startup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let batch_timeout_secs: u64 = var("BATCH_TIMEOUT_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .expect("BATCH_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let publish_bridge_url = var("PUBLISH_BRIDGE_URL")
            .unwrap_or_else(|| "http://localhost:8100".into())
            .trim_end_matches('/')
            .to_string();

        let caption_service_url = var("CAPTION_SERVICE_URL")
            .unwrap_or_else(|| "http://localhost:8200".into())
            .trim_end_matches('/')
            .to_string();

        let recency_lookback_days: i64 = var("RECENCY_LOOKBACK_DAYS")
            .unwrap_or_else(|| "7".into())
            .parse()
            .expect("RECENCY_LOOKBACK_DAYS must be a valid i64");

        let batch_delay_ms: u64 = var("BATCH_DELAY_MS")
            .unwrap_or_else(|| "2000".into())
            .parse()
            .expect("BATCH_DELAY_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            batch_timeout_secs,
            shutdown_timeout_secs,
            publish_bridge_url,
            caption_service_url,
            recency_lookback_days,
            batch_delay_ms,
        }
    }

    /// Engine tunables: defaults with the env overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            recency_lookback_days: self.recency_lookback_days,
            batch_delay_ms: self.batch_delay_ms,
            ..EngineConfig::default()
        }
    }
}
