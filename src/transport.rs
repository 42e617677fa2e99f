//! Network seam: request payloads, the transport trait, and its HTTP impl.
//!
//! The form controller never touches `reqwest` directly. It hands an
//! [`IngestRequest`] to an [`IngestTransport`] and gets back either an
//! [`IngestReceipt`] or a [`RequestError`]. Tests swap in a recording fake;
//! production code uses [`HttpTransport`].
//!
//! ## Response contract
//!
//! | Status | Body | Result |
//! |--------|------|--------|
//! | 2xx | any JSON | `Ok(IngestReceipt)` |
//! | 2xx | empty / not JSON | `Ok(IngestReceipt)` with a `null` body |
//! | non-2xx | `{ "error": "…" }` | `Err(Http { message: "…" })` |
//! | non-2xx | anything else | `Err(Http { message: "Upload failed" })` |
//! | — | no response | `Err(Transport(..))` |

use crate::config::IngestConfig;
use crate::error::{IngestError, RequestError, UPLOAD_FAILED};
use crate::mode::Mode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Body of one ingestion POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IngestRequest {
    /// Serialises as `{ "pdfText": "…" }`.
    Pdf {
        #[serde(rename = "pdfText")]
        pdf_text: String,
    },
    /// Serialises as `{ "videoUrl": "…" }`.
    Video {
        #[serde(rename = "videoUrl")]
        video_url: String,
    },
}

impl IngestRequest {
    /// Build the payload for `mode`, trimming surrounding whitespace.
    pub fn new(mode: Mode, content: &str) -> Self {
        let content = content.trim().to_string();
        match mode {
            Mode::Pdf => IngestRequest::Pdf { pdf_text: content },
            Mode::Video => IngestRequest::Video { video_url: content },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            IngestRequest::Pdf { .. } => Mode::Pdf,
            IngestRequest::Video { .. } => Mode::Video,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            IngestRequest::Pdf { pdf_text } => pdf_text,
            IngestRequest::Video { video_url } => video_url,
        }
    }
}

/// Parsed body of a successful ingestion response.
///
/// The backend's confirmation format is not fixed, so the JSON is kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestReceipt {
    pub body: serde_json::Value,
}

impl IngestReceipt {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// The backend's own `message` field, if it sent one.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(|m| m.as_str())
    }
}

/// Shape of a non-2xx body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Sends one ingestion request and reports the outcome.
///
/// Implementations must be `Send + Sync` so a single transport can be shared
/// as `Arc<dyn IngestTransport>` between forms.
#[async_trait]
pub trait IngestTransport: Send + Sync {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestReceipt, RequestError>;
}

/// [`IngestTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: IngestConfig,
}

impl HttpTransport {
    pub fn new(config: IngestConfig) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| IngestError::ClientBuild(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }
}

#[async_trait]
impl IngestTransport for HttpTransport {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestReceipt, RequestError> {
        let mode = request.mode();
        let url = self.config.endpoint_url(mode);
        debug!(%mode, %url, bytes = request.content().len(), "POST ingestion request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(ref token) = self.config.auth_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(%mode, status = status.as_u16(), %message, "Ingestion rejected");
            return Err(RequestError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parse_receipt(&body))
    }
}

/// Pull `error` out of a failure body, falling back to [`UPLOAD_FAILED`].
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| UPLOAD_FAILED.to_string())
}

fn parse_receipt(body: &str) -> IngestReceipt {
    if body.trim().is_empty() {
        return IngestReceipt::default();
    }
    match serde_json::from_str(body) {
        Ok(value) => IngestReceipt::new(value),
        Err(e) => {
            debug!("Success body is not JSON ({e}); keeping an empty receipt");
            IngestReceipt::default()
        }
    }
}
