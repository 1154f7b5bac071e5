//! Discord channel adapter (stub).
//!
//! Implements the Channel trait for the Discord Bot API. In production
//! this would use `serenity` for the WebSocket gateway; currently a stub
//! with in-process message injection for testing. Each Discord channel id
//! becomes its own history source, so conversations in different channels
//! stay independent.

use async_trait::async_trait;
use steward_core::channel::{Channel, ChannelMessage};
use steward_core::error::ChannelError;
use tokio::sync::mpsc;
use tracing::info;

/// Discord channel configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    pub bot_token: String,
    /// Allowed user ids. Empty = deny all, ["*"] = allow all.
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"[REDACTED]")
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// Discord channel adapter.
pub struct DiscordChannel {
    config: DiscordConfig,
    inject_tx: tokio::sync::Mutex<Option<mpsc::Sender<Result<ChannelMessage, ChannelError>>>>,
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            inject_tx: tokio::sync::Mutex::new(None),
        }
    }

    /// Inject a message as if it came from Discord (for testing).
    pub async fn inject_message(&self, msg: ChannelMessage) -> Result<(), ChannelError> {
        let guard = self.inject_tx.lock().await;
        if let Some(tx) = guard.as_ref() {
            tx.send(Ok(msg))
                .await
                .map_err(|_| ChannelError::ConnectionLost("Message channel closed".into()))
        } else {
            Err(ChannelError::ConnectionLost("Channel not started".into()))
        }
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        if self.config.bot_token.is_empty() {
            return Err(ChannelError::NotConfigured(
                "discord.bot_token is not set".into(),
            ));
        }
        info!("Discord channel starting (stub mode)");
        let (tx, rx) = mpsc::channel(64);
        *self.inject_tx.lock().await = Some(tx);
        Ok(rx)
    }

    async fn send(&self, chat_id: &str, content: &str) -> Result<(), ChannelError> {
        info!(
            chat_id = %chat_id,
            content_len = content.len(),
            "Discord send (stub)"
        );
        Ok(())
    }

    fn is_allowed(&self, sender_id: &str) -> bool {
        if self.config.allowed_users.is_empty() {
            return false;
        }
        if self.config.allowed_users.iter().any(|u| u == "*") {
            return true;
        }
        self.config.allowed_users.iter().any(|u| u == sender_id)
    }
}
