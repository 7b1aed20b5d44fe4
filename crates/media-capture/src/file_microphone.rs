//! Microphone backed by an audio file: the file's bytes are emitted as fixed-size chunks.
//! A missing or unreadable file is reported as a denied permission.

use crate::audio::{MediaStream, MediaTrack, Microphone, DEFAULT_AUDIO_MIME};
use crate::image::mime_for_path;
use async_trait::async_trait;
use bestar_core::CaptureError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Bytes per emitted chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Track that only records whether it was stopped.
#[derive(Debug)]
pub struct FileTrack {
    live: AtomicBool,
}

impl FileTrack {
    fn new() -> Self {
        Self {
            live: AtomicBool::new(true),
        }
    }
}

impl MediaTrack for FileTrack {
    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct FileMicrophone {
    path: PathBuf,
    chunk_size: usize,
}

impl FileMicrophone {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[async_trait]
impl Microphone for FileMicrophone {
    async fn open(&self) -> Result<MediaStream, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "audio source unavailable");
            CaptureError::PermissionDenied(format!("{}: {}", self.path.display(), e))
        })?;

        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in bytes.chunks(self.chunk_size) {
            // Receiver is alive: it is returned below.
            let _ = tx.send(chunk.to_vec());
        }

        let mime = match mime_for_path(&self.path) {
            m if m.starts_with("audio/") => m,
            _ => DEFAULT_AUDIO_MIME,
        };
        let track: Arc<dyn MediaTrack> = Arc::new(FileTrack::new());
        Ok(MediaStream::new(mime, rx, vec![track]))
    }
}
