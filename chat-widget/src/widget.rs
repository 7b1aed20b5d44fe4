use crate::conversation::Conversation;
use tracing::debug;

/// Floating chat shell: a launcher toggling the panel that hosts one [`Conversation`].
///
/// Closing the panel keeps the conversation and any active recording; dropping the widget
/// releases the recording.
pub struct ChatWidget {
    is_open: bool,
    conversation: Conversation,
}

impl ChatWidget {
    /// Starts closed.
    pub fn new(conversation: Conversation) -> Self {
        Self {
            is_open: false,
            conversation,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flips the panel and returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        debug!(is_open = self.is_open, "chat panel toggled");
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
