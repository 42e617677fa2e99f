//! Configuration types for talking to the ingestion backend.
//!
//! All transport behaviour is controlled through [`IngestConfig`], built via
//! its [`IngestConfigBuilder`]. The form controller itself has no knobs; the
//! config only says *where* content goes and *who* is sending it.

use crate::error::IngestError;
use crate::mode::Mode;
use std::fmt;

/// Default backend, matching a locally running dev server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default PDF-text ingestion route.
pub const DEFAULT_PDF_PATH: &str = "/api/chat/upload-pdf";

/// Default video-URL ingestion route.
pub const DEFAULT_VIDEO_PATH: &str = "/api/chat/upload-youtube";

/// Configuration for an ingestion client.
///
/// Built via [`IngestConfig::builder()`] or using [`IngestConfig::default()`].
///
/// # Example
/// ```rust
/// use kb_ingest::IngestConfig;
///
/// let config = IngestConfig::builder()
///     .base_url("https://kb.example.com")
///     .auth_token("secret")
///     .build()
///     .unwrap();
/// assert_eq!(
///     config.endpoint_url(kb_ingest::Mode::Pdf),
///     "https://kb.example.com/api/chat/upload-pdf"
/// );
/// ```
#[derive(Clone)]
pub struct IngestConfig {
    /// Scheme + host (+ optional prefix) of the backend. Default: `http://localhost:3000`.
    ///
    /// A trailing slash is stripped so it can be joined with the endpoint paths.
    pub base_url: String,

    /// Route accepting `{ "pdfText": … }`. Default: `/api/chat/upload-pdf`.
    pub pdf_path: String,

    /// Route accepting `{ "videoUrl": … }`. Default: `/api/chat/upload-youtube`.
    pub video_path: String,

    /// Bearer token identifying the session, if the backend wants one.
    pub auth_token: Option<String>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pdf_path: DEFAULT_PDF_PATH.to_string(),
            video_path: DEFAULT_VIDEO_PATH.to_string(),
            auth_token: None,
            user_agent: concat!("kb-ingest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("base_url", &self.base_url)
            .field("pdf_path", &self.pdf_path)
            .field("video_path", &self.video_path)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl IngestConfig {
    /// Create a new builder for `IngestConfig`.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder {
            config: Self::default(),
        }
    }

    /// Route for the given mode.
    pub fn path_for(&self, mode: Mode) -> &str {
        match mode {
            Mode::Pdf => &self.pdf_path,
            Mode::Video => &self.video_path,
        }
    }

    /// Absolute URL the given mode POSTs to.
    pub fn endpoint_url(&self, mode: Mode) -> String {
        format!("{}{}", self.base_url, self.path_for(mode))
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn pdf_path(mut self, path: impl Into<String>) -> Self {
        self.config.pdf_path = path.into().trim().to_string();
        self
    }

    pub fn video_path(mut self, path: impl Into<String>) -> Self {
        self.config.video_path = path.into().trim().to_string();
        self
    }

    /// Blank tokens are treated as "no token".
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.config.auth_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IngestConfig, IngestError> {
        let c = &self.config;
        if c.base_url.is_empty() {
            return Err(IngestError::InvalidConfig("base URL must not be empty".into()));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(IngestError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        for (name, path) in [("PDF", &c.pdf_path), ("video", &c.video_path)] {
            if !path.starts_with('/') {
                return Err(IngestError::InvalidConfig(format!(
                    "{name} endpoint path must start with '/', got '{path}'"
                )));
            }
        }
        Ok(self.config)
    }
}
