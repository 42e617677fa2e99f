//! Human-readable status line shown under the form.
//!
//! The tone of a message is carried by its first character: `✓` for
//! success, `✗` for failure. Renderers (the CLI, a TUI, a web view) only
//! need [`StatusMessage::tone`] to pick a colour.

use serde::Serialize;
use std::fmt;

/// Marker that prefixes every success message.
pub const SUCCESS_MARKER: &str = "✓";

/// Marker that prefixes every failure message.
pub const FAILURE_MARKER: &str = "✗";

/// Fixed confirmation shown after a successful upload.
pub const SUCCESS_TEXT: &str =
    "✓ Content uploaded successfully! The knowledge base now includes this content.";

/// Shown while a request is in flight.
pub const PROCESSING_TEXT: &str = "Processing and uploading to knowledge base...";

/// Shown when a submission is dropped before the backend answers.
pub const CANCELLED_TEXT: &str = "Upload cancelled before the server responded.";

/// Visual category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn processing() -> Self {
        Self::info(PROCESSING_TEXT)
    }

    pub fn success() -> Self {
        Self {
            text: SUCCESS_TEXT.to_string(),
        }
    }

    /// `✗ {detail}`
    pub fn failure(detail: &str) -> Self {
        Self {
            text: format!("{FAILURE_MARKER} {detail}"),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tone(&self) -> Tone {
        if self.text.starts_with(SUCCESS_MARKER) {
            Tone::Success
        } else if self.text.starts_with(FAILURE_MARKER) {
            Tone::Failure
        } else {
            Tone::Info
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_follows_marker() {
        assert_eq!(StatusMessage::success().tone(), Tone::Success);
        assert_eq!(StatusMessage::failure("boom").tone(), Tone::Failure);
        assert_eq!(StatusMessage::processing().tone(), Tone::Info);
        assert_eq!(
            StatusMessage::info("Please enter a video URL").tone(),
            Tone::Info
        );
    }

    #[test]
    fn failure_embeds_detail() {
        let msg = StatusMessage::failure("Invalid YouTube URL");
        assert_eq!(msg.text(), "✗ Invalid YouTube URL");
    }
}
