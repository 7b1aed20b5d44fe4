//! Audio adapter: microphone acquisition, chunk buffering and scoped release.
//!
//! The microphone stream is owned by exactly one [`RecordingSession`]. Every exit path (finish,
//! release, drop) stops all tracks and cancels the timer; repeated calls are no-ops.

use crate::timer::RecordingTimer;
use async_trait::async_trait;
use bestar_core::{CaptureError, DataUri};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info};

/// Container type used when the stream does not report one.
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// One underlying capture track (e.g. a microphone channel).
pub trait MediaTrack: Send + Sync {
    fn stop(&self);
    fn is_live(&self) -> bool;
}

/// Access to the microphone. `open` may wait indefinitely on a permission prompt.
#[async_trait]
pub trait Microphone: Send + Sync {
    async fn open(&self) -> Result<MediaStream, CaptureError>;
}

/// A granted microphone stream: encoded chunks in emission order plus the tracks to stop.
pub struct MediaStream {
    mime: String,
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(
        mime: impl Into<String>,
        chunks: mpsc::UnboundedReceiver<Vec<u8>>,
        tracks: Vec<Arc<dyn MediaTrack>>,
    ) -> Self {
        Self {
            mime: mime.into(),
            chunks,
            tracks,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn stop_all_tracks(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    /// Moves every chunk already emitted into `into`, in order. Returns how many were moved.
    fn drain_into(&mut self, into: &mut Vec<Vec<u8>>) -> usize {
        let mut moved = 0;
        loop {
            match self.chunks.try_recv() {
                Ok(chunk) => {
                    if !chunk.is_empty() {
                        into.push(chunk);
                        moved += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        moved
    }
}

/// The concatenated recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAudio {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl RecordedAudio {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub async fn encode(&self) -> DataUri {
        DataUri::encode(&self.mime, &self.bytes)
    }
}

/// An active recording. Dropping it releases the microphone.
pub struct RecordingSession {
    stream: Option<MediaStream>,
    chunks: Vec<Vec<u8>>,
    timer: RecordingTimer,
}

impl RecordingSession {
    /// Takes ownership of `stream` and starts the timer.
    pub fn start(stream: MediaStream) -> Self {
        Self {
            stream: Some(stream),
            chunks: Vec::new(),
            timer: RecordingTimer::start(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    pub fn elapsed_display(&self) -> String {
        self.timer.display()
    }

    /// Buffers chunks emitted so far. Returns the total buffered.
    pub fn collect_pending(&mut self) -> usize {
        if let Some(stream) = self.stream.as_mut() {
            let moved = stream.drain_into(&mut self.chunks);
            if moved > 0 {
                debug!(moved, total = self.chunks.len(), "audio chunks buffered");
            }
        }
        self.chunks.len()
    }

    /// Stops the recording: tracks stopped, timer cleared, chunks concatenated.
    ///
    /// Returns `None` when the session was already finished or released.
    pub fn finish(&mut self) -> Option<RecordedAudio> {
        let mut stream = self.stream.take()?;
        stream.stop_all_tracks();
        self.timer.cancel();
        // The final chunk is emitted on stop.
        stream.drain_into(&mut self.chunks);
        let mime = if stream.mime().is_empty() {
            DEFAULT_AUDIO_MIME.to_string()
        } else {
            stream.mime().to_string()
        };
        let bytes = std::mem::take(&mut self.chunks).concat();
        info!(
            bytes = bytes.len(),
            seconds = self.timer.elapsed_seconds(),
            "step: recording finished, microphone released"
        );
        Some(RecordedAudio { mime, bytes })
    }

    /// Discards the recording and releases the microphone. Idempotent.
    pub fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
            info!("step: recording discarded, microphone released");
        }
        self.timer.cancel();
        self.chunks.clear();
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Starts recording sessions over an injected [`Microphone`].
#[derive(Clone)]
pub struct AudioRecorder {
    microphone: Arc<dyn Microphone>,
}

impl AudioRecorder {
    pub fn new(microphone: Arc<dyn Microphone>) -> Self {
        Self { microphone }
    }

    /// Requests microphone access; on success the session and its timer are running.
    pub async fn start(&self) -> Result<RecordingSession, CaptureError> {
        let stream = self.microphone.open().await?;
        info!(mime = %stream.mime(), "step: microphone granted, recording started");
        Ok(RecordingSession::start(stream))
    }
}
