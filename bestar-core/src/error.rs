//! Error types for the chat widget core.
//!
//! [`BestarError`] is the top-level error; [`ValidationError`] covers registration input and
//! [`CaptureError`] covers image/audio capture. None of these is ever surfaced as a crash: the
//! conversation turns each of them into a chat message.

use thiserror::Error;

/// Top-level error (validation, capture, transport, config, IO).
#[derive(Error, Debug)]
pub enum BestarError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Registration input rejected locally; never sent to a server.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name and phone number are both required")]
    MissingFields,

    #[error("Name must contain at least two words")]
    IncompleteName,

    #[error("Phone number must be 8-15 digits, optionally with '+'")]
    InvalidPhone,
}

/// Media capture failures. Recovered locally by appending a system message.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Media too large: {size} bytes (limit {limit} bytes)")]
    MediaTooLarge { size: u64, limit: u64 },

    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture device error: {0}")]
    Device(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BestarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts_into_bestar_error() {
        let err: BestarError = ValidationError::InvalidPhone.into();
        assert!(matches!(err, BestarError::Validation(ValidationError::InvalidPhone)));
    }

    #[test]
    fn test_media_too_large_message_mentions_sizes() {
        let err = CaptureError::MediaTooLarge {
            size: 6_291_456,
            limit: 5_242_880,
        };
        let text = err.to_string();
        assert!(text.contains("6291456"));
        assert!(text.contains("5242880"));
    }
}
