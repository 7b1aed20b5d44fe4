//! Image adapter: size cap and data-URI encoding for user-picked files.

use bestar_core::{CaptureError, DataUri};
use std::path::Path;
use tracing::debug;

/// Largest accepted image (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// A file picked by the user: name, optional declared mime type, contents.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Reads a file from disk; the mime type is inferred from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            mime: Some(mime_for_path(path).to_string()),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared mime, else extension lookup on the name.
    pub fn effective_mime(&self) -> String {
        match &self.mime {
            Some(m) if !m.trim().is_empty() => m.clone(),
            _ => mime_for_path(Path::new(&self.name)).to_string(),
        }
    }
}

/// Mime type from a file extension; `application/octet-stream` when unknown.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "webm" => "audio/webm",
        "ogg" | "oga" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Validates and encodes images for the `image` envelope.
#[derive(Debug, Clone)]
pub struct ImageAdapter {
    max_bytes: u64,
}

impl Default for ImageAdapter {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl ImageAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Rejects files over the cap. Called before anything is appended or sent.
    pub fn check(&self, file: &PickedFile) -> Result<(), CaptureError> {
        if file.size() > self.max_bytes {
            return Err(CaptureError::MediaTooLarge {
                size: file.size(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Encodes the file to a data URI after re-checking the cap.
    pub async fn encode(&self, file: &PickedFile) -> Result<DataUri, CaptureError> {
        self.check(file)?;
        let mime = file.effective_mime();
        let uri = DataUri::encode(&mime, &file.bytes);
        debug!(
            name = %file.name,
            mime = %mime,
            size = file.size(),
            "image encoded"
        );
        Ok(uri)
    }
}
