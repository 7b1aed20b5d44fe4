//! # bestar-core
//!
//! Core types shared by the Be Star chat widget crates: [`Identity`], [`Message`], the outbound
//! webhook [`Envelope`], [`Reply`], [`DataUri`], the error taxonomy, and tracing initialization.
//! Transport-agnostic; used by session-store, media-capture, webhook-client and chat-widget.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{BestarError, CaptureError, Result, ValidationError};
pub use logger::init_tracing;
pub use types::{
    session_id_for, DataUri, Envelope, Identity, Message, MessageKind, Reply, Role,
    ANONYMOUS_SESSION_ID, WEBCHAT_SOURCE,
};
