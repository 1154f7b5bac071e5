//! `steward replay <id>` — regenerate a stored conversation's answer.
//!
//! Projects the stored log into model messages (responses dropped, tool
//! exchanges re-batched) and asks the model with no tools offered. A
//! transport failure here is fatal: replay is a diagnostic surface, not a
//! chat.

use crate::runtime::parse_reference;
use anyhow::Context as _;
use steward_config::AppConfig;
use steward_core::history::HistoryStore;
use steward_core::provider::{ChatProvider, ChatRequest};
use steward_history::SqliteHistory;
use steward_providers::OpenAiCompatProvider;

pub async fn run(reference: &str) -> anyhow::Result<()> {
    let id = parse_reference(reference)?;

    let config = AppConfig::load()?;
    let api_key = config
        .api_key
        .clone()
        .context("No API key configured. Set STEWARD_API_KEY or add api_key to config.toml")?;

    let db_path = config.history_db_path();
    let history = SqliteHistory::new(
        db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("History database path is not valid UTF-8"))?,
    )
    .await?;
    let conversation = history.read_log(id).await?;

    let notes = tokio::fs::read_to_string(config.notes_path()).await.ok();
    let system_prompt =
        steward_agent::trusted_system_prompt(chrono::Local::now().date_naive(), notes.as_deref());

    let messages = steward_transcript::replay_messages(&system_prompt, conversation.entries());

    let provider = OpenAiCompatProvider::new("openai", &config.api_url, api_key);
    let turn = provider
        .complete(ChatRequest {
            model: config.model.clone(),
            messages,
            tools: vec![], // no tools offered during replay
            temperature: config.temperature,
            max_tokens: None,
        })
        .await
        .context("Replay model call failed")?;

    println!("{}", turn.content);
    Ok(())
}
