//! Type definitions shared between the dispatcher and its host.
//!
//! The host runtime delivers one [`IncomingMessage`] per chat message and hands
//! the dispatcher a [`Replier`] bound to the originating room.

use crate::error::Result;

/// A single chat message as delivered by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat room the message was posted in
    pub room: String,
    /// Raw message text
    pub message: String,
    /// Display name of the sender
    pub sender: String,
    /// Whether the room is a group chat
    pub is_group_chat: bool,
}

impl IncomingMessage {
    /// Create a new message.
    pub fn new(
        room: impl Into<String>,
        message: impl Into<String>,
        sender: impl Into<String>,
        is_group_chat: bool,
    ) -> Self {
        Self {
            room: room.into(),
            message: message.into(),
            sender: sender.into(),
            is_group_chat,
        }
    }
}

/// Reply sink provided by the host for the room a message came from.
pub trait Replier {
    /// Send `text` back into the originating room.
    fn reply(&mut self, text: &str) -> Result<()>;
}

/// Collects replies in memory.
impl Replier for Vec<String> {
    fn reply(&mut self, text: &str) -> Result<()> {
        self.push(text.to_string());
        Ok(())
    }
}
