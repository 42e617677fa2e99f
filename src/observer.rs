//! Observer trait for submission lifecycle events.
//!
//! Attach an [`Arc<dyn SubmissionObserver>`] with
//! [`crate::form::UploadForm::with_observer`] to hear about each submission
//! as it starts and finishes. The CLI uses this to drive a spinner; a GUI
//! could forward the same events to its render loop.
//!
//! # Example
//!
//! ```rust
//! use kb_ingest::{Mode, SubmissionObserver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct FailureCounter(AtomicUsize);
//!
//! impl SubmissionObserver for FailureCounter {
//!     fn on_submit_failure(&self, _mode: Mode, message: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("upload failed: {message}");
//!     }
//! }
//! ```

use crate::mode::Mode;
use crate::transport::IngestReceipt;
use std::sync::Arc;

/// Called by the form controller as a submission moves through its states.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SubmissionObserver: Send + Sync {
    /// The request is about to be sent.
    fn on_submit_start(&self, mode: Mode) {
        let _ = mode;
    }

    /// The backend accepted the content.
    fn on_submit_success(&self, mode: Mode, receipt: &IngestReceipt) {
        let _ = (mode, receipt);
    }

    /// The request failed; `message` is what the status line shows (without marker).
    fn on_submit_failure(&self, mode: Mode, message: &str) {
        let _ = (mode, message);
    }

    /// The submission was dropped before the backend answered.
    fn on_submit_abandoned(&self, mode: Mode) {
        let _ = mode;
    }

    /// Submission was refused locally; no request was sent.
    fn on_validation_failed(&self, mode: Mode, prompt: &str) {
        let _ = (mode, prompt);
    }
}

/// Default observer for forms that don't need events.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias for the type stored on the form.
pub type SharedObserver = Arc<dyn SubmissionObserver>;
