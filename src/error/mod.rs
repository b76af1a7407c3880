use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Text returned to tool callers when the image cannot be read.
pub const IMAGE_READ_FAILURE_MESSAGE: &str = "无法读取图片，请检查图片路径是否正确。";

/// Error types for design-lens.
///
/// Image-read failures are split by cause so callers can react to each one;
/// [`AnalyzerError::is_image_read_error`] groups them back together for the
/// surfaces that only need to know "the file could not be read".
///
/// # Examples
///
/// ```
/// use design_lens::{AnalyzerError, Result};
///
/// fn require_key(key: &str) -> Result<()> {
///     if key.trim().is_empty() {
///         return Err(AnalyzerError::Config("OPENAI_API_KEY is empty".into()));
///     }
///     Ok(())
/// }
///
/// match require_key("") {
///     Err(AnalyzerError::Config(msg)) => println!("bad config: {}", msg),
///     other => println!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The image path does not exist
    #[error("Image not found: {}", path.display())]
    ImageNotFound { path: PathBuf },

    /// The image exists but the process may not read it
    #[error("Permission denied reading image: {}", path.display())]
    ImagePermissionDenied { path: PathBuf },

    /// Any other failure while reading the image bytes
    #[error("Failed to read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The endpoint answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error outside of image reading, e.g. writing the report
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AnalyzerError {
    /// Map an I/O error raised while reading `path` to the matching image-read variant.
    pub fn from_image_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => AnalyzerError::ImageNotFound { path },
            io::ErrorKind::PermissionDenied => AnalyzerError::ImagePermissionDenied { path },
            _ => AnalyzerError::ImageRead { path, source: err },
        }
    }

    /// True for the errors that mean "the image file could not be read".
    pub fn is_image_read_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::ImageNotFound { .. }
                | AnalyzerError::ImagePermissionDenied { .. }
                | AnalyzerError::ImageRead { .. }
        )
    }
}

// io::Error, reqwest::Error and serde_json::Error don't implement PartialEq,
// so variants wrapping them never compare equal.
impl PartialEq for AnalyzerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Config(a), Self::Config(b)) => a == b,
            (Self::ImageNotFound { path: a }, Self::ImageNotFound { path: b }) => a == b,
            (Self::ImagePermissionDenied { path: a }, Self::ImagePermissionDenied { path: b }) => {
                a == b
            }
            (
                Self::Api { status: sa, body: ba },
                Self::Api { status: sb, body: bb },
            ) => sa == sb && ba == bb,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for design-lens operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
