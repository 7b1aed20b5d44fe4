//! Conversation states and send results.

use bestar_core::CaptureError;

/// `Gated → Idle → Sending → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No identity yet; nothing can be sent.
    Gated,
    /// Awaiting input.
    Idle,
    /// One request in flight; send controls are disabled.
    Sending,
}

/// Why a user action was ignored without touching the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Gated,
    /// A send is in flight or a recording is active.
    Busy,
    EmptyInput,
    NotRecording,
    /// Recording was cancelled while the microphone prompt was open.
    Cancelled,
}

/// Result of a user action.
#[derive(Debug)]
pub enum SendOutcome {
    /// The envelope was sent and a reply (or the fallback) appended.
    Delivered,
    /// Nothing happened.
    Skipped(SkipReason),
    /// Capture failed locally; a system message was appended and nothing was sent.
    Rejected(CaptureError),
    /// Microphone granted; recording is running.
    Recording,
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered)
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            SendOutcome::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }
}
