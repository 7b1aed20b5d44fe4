//! Registration: validates name and phone, persists the identity once.

use crate::store::SessionStore;
use bestar_core::{Identity, ValidationError};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Accepted phone shape after whitespace removal. ASCII digits only.
pub const PHONE_PATTERN: &str = r"^[0-9+]{8,15}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("PHONE_PATTERN is a valid regex"))
}

/// Removes every whitespace character from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone.split_whitespace().collect()
}

/// Validates raw form input and returns the identity it would register.
///
/// Order: missing fields, then name (at least two tokens), then phone.
pub fn validate(name: &str, phone: &str) -> Result<Identity, ValidationError> {
    let name = name.trim();
    let phone = normalize_phone(phone);

    if name.is_empty() || phone.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if name.split_whitespace().count() < 2 {
        return Err(ValidationError::IncompleteName);
    }
    if !phone_regex().is_match(&phone) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(Identity {
        display_name: name.to_string(),
        phone_number: phone,
    })
}

/// Registration gate over an injected [`SessionStore`].
#[derive(Clone)]
pub struct Registration {
    store: Arc<dyn SessionStore>,
}

impl Registration {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn has_identity(&self) -> bool {
        self.store.get().is_some()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.store.get()
    }

    /// Validates and persists the identity. Once an identity exists it is returned unchanged;
    /// there is no re-registration.
    pub fn register(&self, name: &str, phone: &str) -> Result<Identity, ValidationError> {
        if let Some(existing) = self.store.get() {
            return Ok(existing);
        }
        let identity = validate(name, phone)?;
        self.store.set(identity.clone());
        info!(
            session_id = %identity.session_id(),
            "step: identity registered, gate open"
        );
        Ok(identity)
    }
}
