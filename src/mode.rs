//! Ingestion modes: which kind of content the form is currently collecting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content type the form is configured to ingest.
///
/// The mode picks the active buffer, the endpoint, and the payload shape.
/// Video is the default because that is what the upload page opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Raw text copied out of a PDF.
    Pdf,
    /// URL of a video whose transcript the backend extracts.
    #[default]
    Video,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Video, Mode::Pdf];

    /// Short label used on the mode toggle.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pdf => "PDF Text",
            Mode::Video => "Video",
        }
    }

    /// Prompt shown when the user submits with an empty buffer.
    pub fn validation_prompt(self) -> &'static str {
        match self {
            Mode::Pdf => "Please paste some PDF content first",
            Mode::Video => "Please enter a video URL",
        }
    }

    /// Step-by-step usage notes for this mode.
    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            Mode::Pdf => &[
                "Open your PDF file and copy all the text",
                "Paste the text into the input (or pass --file / stdin)",
                "Submit it to the knowledge base",
                "The assistant will now use this information to answer questions",
            ],
            Mode::Video => &[
                "Find a video with captions/subtitles enabled",
                "Copy the video URL from your browser",
                "Paste it as the video URL",
                "Submit it to the knowledge base",
                "The backend extracts the transcript and learns from it",
            ],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Pdf => "pdf",
            Mode::Video => "video",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Mode::Pdf),
            "video" | "youtube" => Ok(Mode::Video),
            other => Err(format!("unknown mode '{other}' (expected 'pdf' or 'video')")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_video() {
        assert_eq!(Mode::default(), Mode::Video);
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("PDF".parse::<Mode>(), Ok(Mode::Pdf));
        assert_eq!(" youtube ".parse::<Mode>(), Ok(Mode::Video));
        assert!("audio".parse::<Mode>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn every_mode_has_instructions() {
        for mode in Mode::ALL {
            assert!(!mode.instructions().is_empty());
        }
    }
}
