//! Append-only conversation log.

use bestar_core::{Message, Role};
use uuid::Uuid;

/// Insertion-ordered, unbounded. Entries are never removed, reordered or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>, is_media_placeholder: bool) -> &Message {
        // v7: millisecond timestamp prefix plus random bits.
        let id = Uuid::now_v7().to_string();
        self.messages
            .push(Message::new(id, role, text, is_media_placeholder));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
