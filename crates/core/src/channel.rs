//! Channel trait — the abstraction over chat front ends.
//!
//! A channel connects steward to wherever the user types: the terminal, a
//! Discord server. It receives messages and sends replies back; the agent
//! loop in between never knows which front end it is serving.

use crate::error::ChannelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A message received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Sender identifier (platform-specific user id).
    pub sender_id: String,

    /// The text content.
    pub content: String,

    /// The chat/DM identifier within the channel. Combined with the channel
    /// name, this forms the history-partitioning source string.
    pub chat_id: String,
}

/// The core Channel trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "discord", "cli").
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    ///
    /// Returns a receiver that yields incoming messages until the channel
    /// shuts down.
    async fn start(
        &self,
    ) -> std::result::Result<mpsc::Receiver<std::result::Result<ChannelMessage, ChannelError>>, ChannelError>;

    /// Send a reply to a chat.
    async fn send(&self, chat_id: &str, content: &str) -> std::result::Result<(), ChannelError>;

    /// Whether this sender may talk to the agent.
    fn is_allowed(&self, sender_id: &str) -> bool;

    /// The history-partitioning source string for a chat on this channel.
    fn source(&self, chat_id: &str) -> String {
        format!("{}:{}", self.name(), chat_id)
    }
}
