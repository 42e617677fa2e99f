//! # kb-ingest
//!
//! Feed pasted PDF text and video URLs into a knowledge-base ingestion backend.
//!
//! ## Why this crate?
//!
//! A retrieval-augmented assistant is only as good as what has been loaded
//! into its knowledge base. The backend exposes two ingestion routes, one
//! for raw PDF text and one for video URLs (the backend pulls the
//! transcript itself). This crate is the client side of those routes: a
//! small form controller that validates input, performs exactly one request
//! per submission, and turns the outcome into a status line a human can read.
//!
//! ## Flow
//!
//! ```text
//! user input
//!  │
//!  ├─ 1. Mode     pick PDF text or video URL
//!  ├─ 2. Buffer   fill the active buffer (inline / file / stdin)
//!  ├─ 3. Validate empty buffer → prompt, no request
//!  ├─ 4. POST     {pdfText} or {videoUrl} → ingestion endpoint
//!  └─ 5. Status   ✓ success (buffers cleared) / ✗ server error (buffers kept)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kb_ingest::{HttpTransport, IngestConfig, Mode, UploadForm};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IngestConfig::builder()
//!         .base_url("https://kb.example.com")
//!         .build()?;
//!     let mut form = UploadForm::new(Arc::new(HttpTransport::new(config)?));
//!
//!     form.set_mode(Mode::Video);
//!     form.set_buffer("https://youtu.be/abc");
//!     let _ = form.submit().await;
//!
//!     if let Some(status) = form.status() {
//!         println!("{status}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `kb-ingest` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod form;
pub mod ingest;
pub mod input;
pub mod mode;
pub mod observer;
pub mod status;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IngestConfig, IngestConfigBuilder};
pub use error::{IngestError, RequestError, SubmitError, ValidationError};
pub use form::{PendingSubmission, SubmissionState, UploadForm};
pub use ingest::{ingest, ingest_pdf_text, ingest_video_url, OneShotError};
pub use input::{read_text, TextSource};
pub use mode::Mode;
pub use observer::{NoopObserver, SharedObserver, SubmissionObserver};
pub use status::{StatusMessage, Tone};
pub use transport::{HttpTransport, IngestReceipt, IngestRequest, IngestTransport};
