//! Identity storage seam and its in-memory implementation.

use bestar_core::Identity;
use std::sync::{Arc, RwLock};

/// Session-scoped identity storage. Cleared only when the session (process) ends.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Identity>;
    fn set(&self, identity: Identity);
}

/// Identity held in memory for the lifetime of the process. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    slot: Arc<RwLock<Option<Identity>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Option<Identity> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, identity: Identity) {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        assert!(other.get().is_none());

        store.set(Identity {
            display_name: "Sara Ali".to_string(),
            phone_number: "01122334455".to_string(),
        });

        assert_eq!(other.get().unwrap().display_name, "Sara Ali");
    }
}
