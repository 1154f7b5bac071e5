//! `steward chat` — interactive or single-message chat mode.

use crate::runtime::Runtime;
use steward_channels::CliChannel;
use steward_config::AppConfig;
use steward_core::channel::Channel;

pub async fn run(message: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    STEWARD_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        anyhow::bail!("No API key found. See above for setup instructions.");
    }

    let runtime = Runtime::build(config).await?;

    if let Some(msg) = message {
        // Single message mode
        let receipt = runtime.run_turn("cli", &msg).await?;
        println!("{}", receipt.reply);
        println!("— C{}", receipt.id);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  steward — interactive mode");
    println!();
    println!("  Model:   {}", runtime.config.model);
    println!("  Data:    {}", runtime.config.data_dir.display());
    println!("  History: last {} exchanges", runtime.config.history_limit);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let channel = CliChannel::new();
    let mut rx = channel.start().await?;

    print_prompt();
    while let Some(result) = rx.recv().await {
        match result {
            Ok(msg) => {
                let source = channel.source(&msg.chat_id);
                match runtime.run_turn(&source, &msg.content).await {
                    Ok(receipt) => {
                        println!();
                        for line in receipt.reply.lines() {
                            println!("  steward > {line}");
                        }
                        println!("  — C{}", receipt.id);
                        println!();
                    }
                    Err(e) => {
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
                print_prompt();
            }
            Err(e) => {
                eprintln!("  [Channel Error] {e}");
                break;
            }
        }
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("  You > ");
    let _ = std::io::stdout().flush();
}
