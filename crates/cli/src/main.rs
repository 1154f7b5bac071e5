//! steward CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive chat or single-message mode
//! - `show`    — Print a stored conversation transcript verbatim
//! - `replay`  — Ask the model to regenerate a stored conversation's answer
//! - `discord` — Run the Discord front end

use clap::{Parser, Subcommand};

mod commands;
mod runtime;

#[derive(Parser)]
#[command(
    name = "steward",
    about = "steward — a personal assistant agent with a verifiable transcript",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print a stored conversation (e.g. `steward show C42` or `steward show 42`)
    Show {
        /// The conversation reference
        id: String,
    },

    /// Replay a stored conversation and regenerate its answer
    Replay {
        /// The conversation reference
        id: String,
    },

    /// Run the Discord front end
    Discord,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Show { id } => commands::show::run(&id).await?,
        Commands::Replay { id } => commands::replay::run(&id).await?,
        Commands::Discord => commands::discord::run().await?,
    }

    Ok(())
}
