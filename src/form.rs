//! The upload form controller.
//!
//! [`UploadForm`] is the view-model behind the "upload knowledge" screen:
//! a mode toggle, one text buffer per mode, a status line, and a submit
//! action that performs exactly one request per call.
//!
//! ## State machine
//!
//! ```text
//!            submit (buffer non-empty)
//!   Idle ───────────────────────────▶ InFlight
//!    ▲                                 │    │
//!    │                          2xx    │    │  non-2xx / transport error
//!    │                                 ▼    ▼
//!    └──── (next submit) ──── Succeeded    Failed(message)
//! ```
//!
//! Only one submission can be in flight at a time. An empty buffer never
//! reaches the transport; it only updates the status line with a prompt.
//!
//! [`UploadForm::submit`] drives the whole round trip. Event loops that need
//! to render the `InFlight` state while the request runs elsewhere can call
//! [`UploadForm::begin_submit`] and [`UploadForm::finish_submit`] directly,
//! or [`UploadForm::abandon`] to give up on a request.

use crate::error::{RequestError, SubmitError, ValidationError};
use crate::mode::Mode;
use crate::observer::{NoopObserver, SharedObserver};
use crate::status::{StatusMessage, CANCELLED_TEXT};
use crate::transport::{IngestReceipt, IngestRequest, IngestTransport};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    /// Carries the failure text (without the `✗` marker).
    Failed(String),
}

/// A request that has been started by [`UploadForm::begin_submit`] and must
/// be completed with [`UploadForm::finish_submit`].
#[derive(Debug)]
#[must_use = "a pending submission must be finished or abandoned, or the form stays in flight"]
pub struct PendingSubmission {
    request: IngestRequest,
}

impl PendingSubmission {
    pub fn request(&self) -> &IngestRequest {
        &self.request
    }

    pub fn mode(&self) -> Mode {
        self.request.mode()
    }
}

/// Client-side controller for the knowledge-base upload form.
pub struct UploadForm {
    transport: Arc<dyn IngestTransport>,
    observer: SharedObserver,
    mode: Mode,
    pdf_text: String,
    video_url: String,
    state: SubmissionState,
    status: Option<StatusMessage>,
}

impl fmt::Debug for UploadForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadForm")
            .field("mode", &self.mode)
            .field("pdf_text_len", &self.pdf_text.len())
            .field("video_url", &self.video_url)
            .field("state", &self.state)
            .field("status", &self.status)
            .finish()
    }
}

impl UploadForm {
    /// A fresh form: video mode, empty buffers, no status.
    pub fn new(transport: Arc<dyn IngestTransport>) -> Self {
        Self {
            transport,
            observer: Arc::new(NoopObserver),
            mode: Mode::default(),
            pdf_text: String::new(),
            video_url: String::new(),
            state: SubmissionState::Idle,
            status: None,
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn buffer(&self, mode: Mode) -> &str {
        match mode {
            Mode::Pdf => &self.pdf_text,
            Mode::Video => &self.video_url,
        }
    }

    pub fn active_buffer(&self) -> &str {
        self.buffer(self.mode)
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SubmissionState::InFlight
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_in_flight() && !self.active_buffer().trim().is_empty()
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Switch the active mode. The other buffer is left untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Replace the active mode's buffer.
    ///
    /// Inputs are locked while a request is in flight; returns `false` and
    /// leaves the buffer unchanged in that case.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> bool {
        if self.is_in_flight() {
            return false;
        }
        let text = text.into();
        match self.mode {
            Mode::Pdf => self.pdf_text = text,
            Mode::Video => self.video_url = text,
        }
        true
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Validate the active buffer and, if it has content, send it.
    ///
    /// On success both buffers are cleared. On failure they are kept so the
    /// user can fix the input or simply retry.
    ///
    /// If the returned future is dropped before the backend answers (a
    /// caller-side timeout, `select!` against Ctrl-C), the form leaves
    /// `InFlight` as if [`abandon`](Self::abandon) had been called.
    pub async fn submit(&mut self) -> Result<IngestReceipt, SubmitError> {
        let pending = self.begin_submit()?;
        let mode = pending.mode();
        let transport = Arc::clone(&self.transport);
        let mut guard = AbandonOnDrop {
            form: self,
            mode,
            armed: true,
        };
        let result = transport.ingest(pending.request()).await;
        guard.armed = false;
        guard.form.finish_submit(pending, result)
    }

    /// First half of [`submit`](Self::submit): validate and enter `InFlight`.
    ///
    /// No request is sent here. The caller must pass the returned
    /// [`PendingSubmission`] and the transport outcome to
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.is_in_flight() {
            return Err(SubmitError::Busy);
        }

        let mode = self.mode;
        if self.active_buffer().trim().is_empty() {
            let prompt = mode.validation_prompt();
            self.status = Some(StatusMessage::info(prompt));
            self.observer.on_validation_failed(mode, prompt);
            return Err(ValidationError { mode }.into());
        }

        let request = IngestRequest::new(mode, self.active_buffer());
        info!(%mode, chars = request.content().len(), "Submitting to knowledge base");

        self.state = SubmissionState::InFlight;
        self.status = Some(StatusMessage::processing());
        self.observer.on_submit_start(mode);

        Ok(PendingSubmission { request })
    }

    /// Second half of [`submit`](Self::submit): record the outcome and leave `InFlight`.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<IngestReceipt, RequestError>,
    ) -> Result<IngestReceipt, SubmitError> {
        let mode = pending.mode();
        match result {
            Ok(receipt) => {
                info!(%mode, "Upload accepted");
                self.pdf_text.clear();
                self.video_url.clear();
                self.state = SubmissionState::Succeeded;
                self.status = Some(StatusMessage::success());
                self.observer.on_submit_success(mode, &receipt);
                Ok(receipt)
            }
            Err(err) => {
                let message = err.user_message();
                warn!(%mode, error = %message, "Upload failed");
                self.state = SubmissionState::Failed(message.clone());
                self.status = Some(StatusMessage::failure(&message));
                self.observer.on_submit_failure(mode, &message);
                Err(err.into())
            }
        }
    }

    /// Give up on a submission started with [`begin_submit`](Self::begin_submit).
    ///
    /// The form returns to `Idle` with its buffers intact, so the user can
    /// edit and submit again.
    pub fn abandon(&mut self, pending: PendingSubmission) {
        self.reset_in_flight(pending.mode());
    }

    fn reset_in_flight(&mut self, mode: Mode) {
        if !self.is_in_flight() {
            return;
        }
        warn!(%mode, "Upload abandoned before the backend answered");
        self.state = SubmissionState::Idle;
        self.status = Some(StatusMessage::info(CANCELLED_TEXT));
        self.observer.on_submit_abandoned(mode);
    }
}

/// Returns the form to `Idle` if `submit` is dropped mid-request.
struct AbandonOnDrop<'a> {
    form: &'a mut UploadForm,
    mode: Mode,
    armed: bool,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.form.reset_in_flight(self.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::SubmissionObserver;
    use crate::status::{Tone, FAILURE_MARKER, SUCCESS_MARKER};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and answers with a scripted result.
    struct FakeTransport {
        calls: Mutex<Vec<IngestRequest>>,
        reply: Result<IngestReceipt, RequestError>,
    }

    impl FakeTransport {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply: Ok(IngestReceipt::new(json!({ "success": true }))),
            })
        }

        fn failing(reply: RequestError) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply: Err(reply),
            })
        }

        fn calls(&self) -> Vec<IngestRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IngestTransport for FakeTransport {
        async fn ingest(&self, request: &IngestRequest) -> Result<IngestReceipt, RequestError> {
            self.calls.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    /// Never answers.
    struct HangingTransport;

    #[async_trait]
    impl IngestTransport for HangingTransport {
        async fn ingest(&self, _request: &IngestRequest) -> Result<IngestReceipt, RequestError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl SubmissionObserver for EventLog {
        fn on_submit_start(&self, mode: Mode) {
            self.0.lock().unwrap().push(format!("start:{mode}"));
        }
        fn on_submit_success(&self, mode: Mode, _receipt: &IngestReceipt) {
            self.0.lock().unwrap().push(format!("ok:{mode}"));
        }
        fn on_submit_failure(&self, mode: Mode, message: &str) {
            self.0.lock().unwrap().push(format!("fail:{mode}:{message}"));
        }
        fn on_validation_failed(&self, mode: Mode, _prompt: &str) {
            self.0.lock().unwrap().push(format!("invalid:{mode}"));
        }
        fn on_submit_abandoned(&self, mode: Mode) {
            self.0.lock().unwrap().push(format!("abandoned:{mode}"));
        }
    }

    #[test]
    fn new_form_is_idle_video_mode() {
        let form = UploadForm::new(FakeTransport::ok());
        assert_eq!(form.mode(), Mode::Video);
        assert_eq!(form.state(), &SubmissionState::Idle);
        assert!(form.status().is_none());
        assert!(!form.can_submit());
    }

    #[test]
    fn switching_modes_preserves_inactive_buffer() {
        let mut form = UploadForm::new(FakeTransport::ok());
        form.set_buffer("https://youtu.be/abc");
        form.set_mode(Mode::Pdf);
        assert_eq!(form.active_buffer(), "");
        form.set_buffer("Section 1. Definitions");
        form.set_mode(Mode::Video);
        assert_eq!(form.active_buffer(), "https://youtu.be/abc");
        assert_eq!(form.buffer(Mode::Pdf), "Section 1. Definitions");
    }

    #[tokio::test]
    async fn empty_buffer_never_hits_the_network() {
        let transport = FakeTransport::ok();
        let mut form = UploadForm::new(transport.clone());
        form.set_mode(Mode::Pdf);

        let err = form.submit().await.unwrap_err();
        assert_eq!(err, SubmitError::Validation(ValidationError { mode: Mode::Pdf }));
        assert!(transport.calls().is_empty());
        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(
            form.status().map(|s| s.text()),
            Some("Please paste some PDF content first")
        );
    }

    #[tokio::test]
    async fn whitespace_only_buffer_is_empty() {
        let transport = FakeTransport::ok();
        let mut form = UploadForm::new(transport.clone());
        form.set_buffer("   \n\t ");
        assert!(!form.can_submit());
        assert!(matches!(
            form.submit().await,
            Err(SubmitError::Validation(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn video_success_clears_buffers() {
        let transport = FakeTransport::ok();
        let mut form = UploadForm::new(transport.clone());
        form.set_mode(Mode::Pdf);
        form.set_buffer("leftover pdf text");
        form.set_mode(Mode::Video);
        form.set_buffer("https://youtu.be/abc");

        let receipt = form.submit().await.unwrap();
        assert_eq!(receipt.body, json!({ "success": true }));

        assert_eq!(
            transport.calls(),
            vec![IngestRequest::Video {
                video_url: "https://youtu.be/abc".into()
            }]
        );
        assert_eq!(form.buffer(Mode::Video), "");
        assert_eq!(form.buffer(Mode::Pdf), "");
        assert_eq!(form.state(), &SubmissionState::Succeeded);
        let status = form.status().unwrap();
        assert!(status.text().starts_with(SUCCESS_MARKER));
        assert_eq!(status.tone(), Tone::Success);
    }

    #[tokio::test]
    async fn pdf_payload_is_trimmed() {
        let transport = FakeTransport::ok();
        let mut form = UploadForm::new(transport.clone());
        form.set_mode(Mode::Pdf);
        form.set_buffer("\n  Article 5 applies.  \n");
        form.submit().await.unwrap();
        assert_eq!(
            transport.calls(),
            vec![IngestRequest::Pdf {
                pdf_text: "Article 5 applies.".into()
            }]
        );
    }

    #[tokio::test]
    async fn server_error_keeps_buffers_and_reports_text() {
        let transport = FakeTransport::failing(RequestError::Http {
            status: 400,
            message: "Could not fetch transcript".into(),
        });
        let mut form = UploadForm::new(transport.clone());
        form.set_buffer("https://youtu.be/nocaptions");

        let err = form.submit().await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Request(RequestError::Http { status: 400, .. })
        ));
        assert_eq!(form.active_buffer(), "https://youtu.be/nocaptions");
        assert_eq!(
            form.state(),
            &SubmissionState::Failed("Could not fetch transcript".into())
        );
        let status = form.status().unwrap();
        assert!(status.text().starts_with(FAILURE_MARKER));
        assert!(status.text().contains("Could not fetch transcript"));
        assert!(!form.is_in_flight());
        assert!(form.can_submit(), "user can retry after a failure");
    }

    #[tokio::test]
    async fn blank_transport_error_uses_generic_text() {
        let transport = FakeTransport::failing(RequestError::Transport(String::new()));
        let mut form = UploadForm::new(transport);
        form.set_buffer("https://youtu.be/abc");
        form.submit().await.unwrap_err();
        assert_eq!(
            form.status().unwrap().text(),
            "✗ Error uploading content. Please try again."
        );
    }

    #[test]
    fn in_flight_blocks_second_submit_and_locks_input() {
        let transport = FakeTransport::ok();
        let mut form = UploadForm::new(transport.clone());
        form.set_buffer("https://youtu.be/abc");

        let pending = form.begin_submit().unwrap();
        assert!(form.is_in_flight());
        assert!(!form.can_submit());
        assert_eq!(form.status().unwrap().tone(), Tone::Info);

        assert_eq!(form.begin_submit().unwrap_err(), SubmitError::Busy);
        assert!(!form.set_buffer("https://youtu.be/other"));
        assert_eq!(form.active_buffer(), "https://youtu.be/abc");

        form.finish_submit(pending, Ok(IngestReceipt::default()))
            .unwrap();
        assert!(!form.is_in_flight());
        assert!(form.set_buffer("https://youtu.be/next"));
        assert!(transport.calls().is_empty(), "begin/finish never call the transport");
    }

    #[test]
    fn mode_switch_mid_flight_reports_original_mode() {
        let log = Arc::new(EventLog::default());
        let mut form = UploadForm::new(FakeTransport::ok()).with_observer(log.clone());
        form.set_buffer("https://youtu.be/abc");

        let pending = form.begin_submit().unwrap();
        form.set_mode(Mode::Pdf);
        form.finish_submit(pending, Err(RequestError::Transport("reset".into())))
            .unwrap_err();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["start:video".to_string(), "fail:video:reset".to_string()]
        );
        assert_eq!(form.buffer(Mode::Video), "https://youtu.be/abc");
    }

    #[tokio::test]
    async fn observer_sees_validation_and_success() {
        let log = Arc::new(EventLog::default());
        let mut form = UploadForm::new(FakeTransport::ok()).with_observer(log.clone());
        form.set_mode(Mode::Pdf);
        let _ = form.submit().await;
        form.set_buffer("text");
        form.submit().await.unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                "invalid:pdf".to_string(),
                "start:pdf".to_string(),
                "ok:pdf".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn dropped_submit_leaves_form_usable() {
        let log = Arc::new(EventLog::default());
        let mut form = UploadForm::new(Arc::new(HangingTransport)).with_observer(log.clone());
        form.set_buffer("https://youtu.be/abc");

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), form.submit()).await;
        assert!(timed_out.is_err());

        assert!(!form.is_in_flight());
        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.active_buffer(), "https://youtu.be/abc");
        assert_eq!(form.status().unwrap().text(), CANCELLED_TEXT);
        assert!(form.set_buffer("https://youtu.be/retry"));
        assert!(form.begin_submit().is_ok());
        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                "start:video".to_string(),
                "abandoned:video".to_string(),
                "start:video".to_string()
            ]
        );
    }

    #[test]
    fn abandon_releases_two_phase_submission() {
        let mut form = UploadForm::new(FakeTransport::ok());
        form.set_mode(Mode::Pdf);
        form.set_buffer("Clause 4.2");

        let pending = form.begin_submit().unwrap();
        form.abandon(pending);

        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.active_buffer(), "Clause 4.2");
        assert!(form.can_submit());
    }
}
