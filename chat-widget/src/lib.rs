//! # Chat widget
//!
//! The conversation state machine behind the Be Star chat bubble. A [`Conversation`] is gated on a
//! registered identity, allows one send in flight, appends the user's message before the network
//! call and the reply (or fallback) after it, and owns at most one microphone recording.
//! [`ChatWidget`] adds the open/close shell.

mod conversation;
mod log;
mod state;
mod texts;
mod widget;

pub use conversation::Conversation;
pub use log::MessageLog;
pub use state::{ConversationState, SendOutcome, SkipReason};
pub use texts::ConversationTexts;
pub use widget::ChatWidget;
