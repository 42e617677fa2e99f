//! Input resolution: turn a user-supplied source into buffer text.
//!
//! The CLI accepts content three ways: inline (`--text`), from a file
//! (`--file notes.txt`), or from stdin (`-`). Files are checked for
//! existence and read permission up front so the user gets a clear message
//! instead of a bare `io::Error`.

use crate::error::IngestError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where buffer content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl TextSource {
    /// `-` means stdin, anything else is a path.
    pub fn from_path_arg(arg: &str) -> Self {
        if arg == "-" {
            TextSource::Stdin
        } else {
            TextSource::File(PathBuf::from(arg))
        }
    }
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    let input = input.trim();
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read the source to a string.
///
/// Blank content is returned as-is; the form decides whether it is
/// submittable so every mode reports it the same way.
pub fn read_text(source: &TextSource) -> Result<String, IngestError> {
    let text = match source {
        TextSource::Inline(s) => s.clone(),
        TextSource::File(path) => read_file(path)?,
        TextSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| IngestError::InputRead {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };

    Ok(text)
}

fn read_file(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} bytes from {}", text.len(), path.display());
            Ok(text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(IngestError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(IngestError::InputRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
