//! # Session store
//!
//! Holds the visitor [`Identity`](bestar_core::Identity) for the lifetime of the widget session.
//! [`SessionStore`] is the injected get/set seam; [`InMemorySessionStore`] is the process-scoped
//! implementation; [`Registration`] validates input and opens the gate exactly once.

pub mod registration;
pub mod store;

pub use registration::{normalize_phone, validate, Registration, PHONE_PATTERN};
pub use store::{InMemorySessionStore, SessionStore};
