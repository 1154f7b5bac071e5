//! `steward discord` — run the Discord front end.
//!
//! Messages are processed one at a time in arrival order; each Discord
//! channel id is its own history source. Turns are not interleaved — two
//! users typing at once queue behind each other, which also keeps the
//! notes and calendar files single-writer.

use crate::runtime::Runtime;
use steward_channels::{DiscordChannel, DiscordConfig};
use steward_config::AppConfig;
use steward_core::channel::Channel;
use tracing::{info, warn};

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    let bot_token = config
        .discord
        .bot_token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("discord.bot_token is not configured"))?;
    let discord_config = DiscordConfig {
        bot_token,
        allowed_users: config.discord.allowed_users.clone(),
    };

    let runtime = Runtime::build(config).await?;
    let channel = DiscordChannel::new(discord_config);
    let mut rx = channel.start().await?;

    info!("Discord front end running");

    while let Some(result) = rx.recv().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "Discord receive error");
                continue;
            }
        };

        if !channel.is_allowed(&msg.sender_id) {
            warn!(sender = %msg.sender_id, "Ignoring message from unallowed sender");
            continue;
        }

        let source = channel.source(&msg.chat_id);
        let reply = match runtime.run_turn(&source, &msg.content).await {
            Ok(receipt) => format!("{}\n-# C{}", receipt.reply, receipt.id),
            Err(e) => {
                // Recovered as a user-visible reply; the operator log gets
                // the details.
                warn!(error = %e, "Turn failed");
                "Something went wrong handling that message. Please try again.".to_string()
            }
        };

        if let Err(e) = channel.send(&msg.chat_id, &reply).await {
            warn!(error = %e, "Failed to deliver reply");
        }
    }

    info!("Discord channel closed, shutting down");
    Ok(())
}
