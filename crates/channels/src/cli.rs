//! CLI channel — interactive terminal-based chat.
//!
//! The simplest front end: reads from stdin, writes to stdout. All turns
//! share the single `cli` history source.

use async_trait::async_trait;
use steward_core::channel::{Channel, ChannelMessage};
use steward_core::error::ChannelError;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Interactive CLI channel for terminal-based chat.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let stdin = io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            continue;
                        }

                        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
                            break;
                        }

                        let msg = ChannelMessage {
                            sender_id: "local_user".into(),
                            content: line,
                            chat_id: "cli".into(),
                        };

                        if tx.send(Ok(msg)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF (Ctrl+D)
                    Err(e) => {
                        let _ = tx
                            .send(Err(ChannelError::ConnectionLost(e.to_string())))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, _chat_id: &str, content: &str) -> Result<(), ChannelError> {
        println!("{content}");
        Ok(())
    }

    fn is_allowed(&self, _sender_id: &str) -> bool {
        true // CLI is always allowed (local user)
    }

    /// The CLI is one flat stream; every chat maps to the same source.
    fn source(&self, _chat_id: &str) -> String {
        "cli".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_channel_properties() {
        let ch = CliChannel::new();
        assert_eq!(ch.name(), "cli");
        assert!(ch.is_allowed("anyone"));
        assert_eq!(ch.source("whatever"), "cli");
    }
}
