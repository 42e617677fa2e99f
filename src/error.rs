//! Error types for the kb-ingest library.
//!
//! Two distinct error families reflect two distinct failure modes:
//!
//! * [`IngestError`] — **Setup**: the client cannot be used at all
//!   (bad configuration, unreadable input file). Returned from config
//!   builders, [`crate::input`] helpers and transport construction.
//!
//! * [`SubmitError`] — **Per-submission**: one attempt to push content into
//!   the knowledge base failed. Either the form rejected it before any
//!   network traffic ([`ValidationError`]), or the round trip itself failed
//!   ([`RequestError`]). Both are recoverable by submitting again; the form
//!   keeps its buffers so nothing the user typed is lost.

use crate::mode::Mode;
use std::path::PathBuf;
use thiserror::Error;

/// Fallback shown when the backend rejects a request without an `error` field.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Fallback shown when a transport error carries no usable text.
pub const GENERIC_FAILURE: &str = "Error uploading content. Please try again.";

/// Fatal setup errors returned by the kb-ingest library.
#[derive(Debug, Error)]
pub enum IngestError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// reqwest refused to build an HTTP client (TLS backend, bad header, …).
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Text source file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the file (or stdin) failed part-way through.
    #[error("Failed to read '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The active buffer was empty, so the form refused to submit.
///
/// The display text is the prompt shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .mode.validation_prompt())]
pub struct ValidationError {
    pub mode: Mode,
}

/// A single ingestion round trip failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The endpoint answered with a non-2xx status.
    ///
    /// `message` is the server's `error` field, or [`UPLOAD_FAILED`].
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (DNS, refused connection, TLS…).
    #[error("{0}")]
    Transport(String),
}

impl RequestError {
    /// The user-facing text for this failure, never empty.
    pub fn user_message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            text
        }
    }

    /// HTTP status code, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            RequestError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err.to_string())
    }
}

/// Why a call to [`crate::form::UploadForm::submit`] did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Nothing to send; no network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still in flight; no network call was made.
    #[error("A submission is already in progress")]
    Busy,

    /// The request was sent but failed.
    #[error(transparent)]
    Request(#[from] RequestError),
}
