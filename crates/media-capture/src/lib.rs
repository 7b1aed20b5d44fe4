//! # Media capture
//!
//! Turns user-picked images and microphone recordings into transport-ready [`DataUri`]s.
//!
//! - [`ImageAdapter`]: rejects files over [`MAX_IMAGE_BYTES`], encodes the rest.
//! - [`AudioRecorder`] / [`RecordingSession`]: acquires a [`Microphone`] stream on start, buffers
//!   chunks in arrival order, and releases every track on stop, cancel or drop.
//! - [`RecordingTimer`]: one-second elapsed counter shown as `MM:SS`.
//! - [`FileMicrophone`]: a [`Microphone`] fed from an audio file, for terminal use.
//!
//! [`DataUri`]: bestar_core::DataUri

mod audio;
mod file_microphone;
mod image;
mod timer;

pub use audio::{AudioRecorder, MediaStream, MediaTrack, Microphone, RecordedAudio, RecordingSession, DEFAULT_AUDIO_MIME};
pub use file_microphone::{FileMicrophone, FileTrack, DEFAULT_CHUNK_SIZE};
pub use image::{mime_for_path, ImageAdapter, PickedFile, MAX_IMAGE_BYTES};
pub use timer::{format_elapsed, RecordingTimer};
