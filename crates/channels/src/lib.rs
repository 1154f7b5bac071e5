//! Chat front ends for steward.
//!
//! Each front end implements `steward_core::Channel` and maps its chats to
//! history sources: the CLI is one flat stream, Discord partitions per
//! channel id.

pub mod cli;
pub mod discord;

pub use cli::CliChannel;
pub use discord::{DiscordChannel, DiscordConfig};
