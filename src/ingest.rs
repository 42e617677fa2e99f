//! One-shot ingestion entry points.
//!
//! For callers that have a single piece of content and no UI: build a
//! transport, fill a fresh [`UploadForm`], submit once. Interactive front
//! ends should hold an [`UploadForm`] themselves so the status line and
//! buffers survive between submissions.

use crate::config::IngestConfig;
use crate::error::{IngestError, SubmitError};
use crate::form::UploadForm;
use crate::mode::Mode;
use crate::observer::SharedObserver;
use crate::transport::{HttpTransport, IngestReceipt};
use std::sync::Arc;
use tracing::info;

/// Why a one-shot ingestion failed.
#[derive(Debug, thiserror::Error)]
pub enum OneShotError {
    #[error(transparent)]
    Setup(#[from] IngestError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Send pasted PDF text to the knowledge base.
///
/// # Example
/// ```rust,no_run
/// use kb_ingest::{ingest_pdf_text, IngestConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IngestConfig::builder().base_url("https://kb.example.com").build()?;
/// let receipt = ingest_pdf_text("Article 1. Scope ...", &config).await?;
/// println!("{:?}", receipt.message());
/// # Ok(())
/// # }
/// ```
pub async fn ingest_pdf_text(
    text: impl Into<String>,
    config: &IngestConfig,
) -> Result<IngestReceipt, OneShotError> {
    ingest(Mode::Pdf, text.into(), config, None).await
}

/// Ask the knowledge base to ingest the transcript of a video.
pub async fn ingest_video_url(
    url: impl Into<String>,
    config: &IngestConfig,
) -> Result<IngestReceipt, OneShotError> {
    ingest(Mode::Video, url.into(), config, None).await
}

/// Submit `content` in `mode`, optionally reporting to `observer`.
pub async fn ingest(
    mode: Mode,
    content: String,
    config: &IngestConfig,
    observer: Option<SharedObserver>,
) -> Result<IngestReceipt, OneShotError> {
    info!(%mode, base_url = %config.base_url, "One-shot ingestion");
    let transport = HttpTransport::new(config.clone())?;
    let mut form = UploadForm::new(Arc::new(transport));
    if let Some(observer) = observer {
        form = form.with_observer(observer);
    }
    form.set_mode(mode);
    form.set_buffer(content);
    Ok(form.submit().await?)
}
