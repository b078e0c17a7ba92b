//! HTTP clients for the publishing bridge and the caption service.
//!
//! Both implement the engine's collaborator traits over [`reqwest`]. Calls
//! are not retried here: a failed publish is recorded on the entry and
//! retried by the user, and batch runs already move on to the next item.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use editoria_core::content::{GeneratedCaptions, SlotContext};
use editoria_core::ports::{CaptionGenerator, CollaboratorError, Publisher};
use editoria_core::publishing::{PublishReceipt, PublishRequest};

/// Timeout for a single publish call.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single caption call. Generation is slower than publishing.
const CAPTION_TIMEOUT: Duration = Duration::from_secs(90);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for bridge calls.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The underlying HTTP request failed (network, DNS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote service returned a non-2xx status code.
    #[error("Service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl BridgeError {
    fn into_collaborator(self, timeout: Duration) -> CollaboratorError {
        match self {
            BridgeError::Request(e) if e.is_timeout() => CollaboratorError::Timeout {
                elapsed_ms: timeout.as_millis() as u64,
            },
            BridgeError::Request(e) if e.is_decode() => {
                CollaboratorError::InvalidResponse(e.to_string())
            }
            BridgeError::Request(e) => CollaboratorError::Unavailable(e.to_string()),
            BridgeError::HttpStatus { status, body } => {
                CollaboratorError::Rejected(format!("HTTP {status}: {body}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared client
// ---------------------------------------------------------------------------

/// A JSON-over-HTTP endpoint with its own timeout.
#[derive(Debug, Clone)]
struct JsonEndpoint {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl JsonEndpoint {
    fn new(url: String, timeout: Duration) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url, timeout })
    }

    async fn try_post<B, R>(&self, body: &B) -> Result<R, BridgeError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let response = self.client.post(&self.url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn post<B, R>(&self, body: &B) -> Result<R, CollaboratorError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.try_post(body).await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "Bridge call failed");
            e.into_collaborator(self.timeout)
        })
    }
}

// ---------------------------------------------------------------------------
// Publishing bridge
// ---------------------------------------------------------------------------

/// Posts [`PublishRequest`]s to `{base_url}/publish`.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    endpoint: JsonEndpoint,
}

impl HttpPublisher {
    pub fn new(base_url: &str) -> Result<Self, BridgeError> {
        Ok(Self {
            endpoint: JsonEndpoint::new(format!("{base_url}/publish"), PUBLISH_TIMEOUT)?,
        })
    }
}

impl Publisher for HttpPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, CollaboratorError> {
        let receipt: PublishReceipt = self.endpoint.post(request).await?;
        tracing::debug!(
            entry_id = request.entry_id,
            post_id = ?receipt.post_id,
            scheduled = request.scheduled_time.is_some(),
            "Publishing bridge accepted post"
        );
        Ok(receipt)
    }
}

// ---------------------------------------------------------------------------
// Caption service
// ---------------------------------------------------------------------------

/// Posts [`SlotContext`]s to `{base_url}/captions`.
#[derive(Debug, Clone)]
pub struct HttpCaptionGenerator {
    endpoint: JsonEndpoint,
}

impl HttpCaptionGenerator {
    pub fn new(base_url: &str) -> Result<Self, BridgeError> {
        Ok(Self {
            endpoint: JsonEndpoint::new(format!("{base_url}/captions"), CAPTION_TIMEOUT)?,
        })
    }
}

impl CaptionGenerator for HttpCaptionGenerator {
    async fn generate(
        &self,
        context: &SlotContext,
    ) -> Result<GeneratedCaptions, CollaboratorError> {
        self.endpoint.post(context).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
