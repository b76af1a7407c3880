use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, instrument, trace};

use crate::error::{AnalyzerError, Result};

/// MIME type declared when nothing better is known.
pub const FALLBACK_MIME: &str = "image/png";

/// How the MIME type of the inline image is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MimePolicy {
    /// Always declare `image/png`, whatever the file holds.
    #[default]
    AlwaysPng,
    /// Sniff the file signature, then the extension, then fall back to PNG.
    Detect,
}

impl FromStr for MimePolicy {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detect" | "auto" => Ok(MimePolicy::Detect),
            "png" => Ok(MimePolicy::AlwaysPng),
            other => Err(AnalyzerError::Config(format!(
                "unknown image MIME policy {:?}, expected \"detect\" or \"png\"",
                other
            ))),
        }
    }
}

impl fmt::Display for MimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MimePolicy::Detect => f.write_str("detect"),
            MimePolicy::AlwaysPng => f.write_str("png"),
        }
    }
}

/// An image file read from disk and base64-encoded for inline transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub path: PathBuf,
    pub mime_type: String,
    /// Standard, padded base64 of the raw file bytes.
    pub data: String,
}

impl EncodedImage {
    /// Read `path` and encode it, choosing the MIME type per `policy`.
    #[instrument(name = "encoded_image_load", skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>, policy: MimePolicy) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_image_bytes(path).await?;
        let mime_type = match policy {
            MimePolicy::Detect => detect_mime(&bytes, path),
            MimePolicy::AlwaysPng => FALLBACK_MIME.to_string(),
        };
        debug!(bytes = bytes.len(), mime = %mime_type, "Image encoded");

        Ok(Self {
            path: path.to_path_buf(),
            mime_type,
            data: encode_bytes(&bytes),
        })
    }

    /// Build from bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            data: encode_bytes(bytes),
        }
    }

    /// `data:<mime>;base64,<data>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Read an image file and return the base64 encoding of its raw bytes.
pub async fn encode_image(path: impl AsRef<Path>) -> Result<String> {
    let bytes = read_image_bytes(path.as_ref()).await?;
    Ok(encode_bytes(&bytes))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

async fn read_image_bytes(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        debug!(path = %path.display(), error = %e, kind = ?e.kind(), "Failed to read image");
        AnalyzerError::from_image_io(path, e)
    })
}

/// Pick a MIME type from the file signature, then the extension.
pub fn detect_mime(bytes: &[u8], path: &Path) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        trace!(?format, "MIME type from file signature");
        return format.to_mime_type().to_string();
    }

    if let Some(guess) = mime_guess::from_path(path)
        .iter()
        .find(|m| m.type_() == mime_guess::mime::IMAGE)
    {
        trace!(mime = %guess, "MIME type from extension");
        return guess.essence_str().to_string();
    }

    FALLBACK_MIME.to_string()
}
