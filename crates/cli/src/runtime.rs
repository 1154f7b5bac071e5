//! Shared assembly: config → provider, registries, loops, history store.

use anyhow::Context as _;
use std::sync::Arc;
use steward_agent::{AgentConfig, SubagentLoop, TrustedLoop, trusted_system_prompt};
use steward_config::AppConfig;
use steward_core::history::HistoryStore;
use steward_history::SqliteHistory;
use steward_providers::OpenAiCompatProvider;
use steward_tools::ToolPaths;

/// Everything a front end needs to run turns.
pub struct Runtime {
    pub config: AppConfig,
    pub history: SqliteHistory,
    agent: TrustedLoop,
}

/// The result of one completed, persisted turn.
pub struct TurnReceipt {
    /// The stored conversation reference (`C<id>`).
    pub id: i64,
    pub reply: String,
}

impl Runtime {
    /// Build the full runtime from the loaded configuration.
    pub async fn build(config: AppConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("No API key configured. Set STEWARD_API_KEY or add api_key to config.toml")?;

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {}", config.data_dir.display()))?;

        let provider: Arc<OpenAiCompatProvider> =
            Arc::new(OpenAiCompatProvider::new("openai", &config.api_url, api_key));

        let paths = ToolPaths {
            notes: config.notes_path(),
            calendar: config.calendar_path(),
        };
        let trusted_tools = Arc::new(steward_tools::trusted_registry(
            &paths,
            config.allow_calendar_writes,
        ));
        let untrusted_tools = Arc::new(steward_tools::untrusted_registry());

        let agent_config = AgentConfig {
            model: config.model.clone(),
            temperature: config.temperature,
            max_iterations: config.max_iterations,
        };

        let subagent = SubagentLoop::new(provider.clone(), untrusted_tools, agent_config.clone());
        let agent = TrustedLoop::new(provider, trusted_tools, subagent, agent_config);

        let db_path = config.history_db_path();
        let history = SqliteHistory::new(
            db_path
                .to_str()
                .context("History database path is not valid UTF-8")?,
        )
        .await?;

        Ok(Self {
            config,
            history,
            agent,
        })
    }

    /// The trusted system prompt for right now: persona, date, notes.
    pub async fn system_prompt(&self) -> String {
        let notes = tokio::fs::read_to_string(self.config.notes_path()).await.ok();
        trusted_system_prompt(chrono::Local::now().date_naive(), notes.as_deref())
    }

    /// Run one turn for `source` and persist its log.
    pub async fn run_turn(&self, source: &str, prompt: &str) -> anyhow::Result<TurnReceipt> {
        let history = self
            .history
            .recent_exchanges(source, self.config.history_limit)
            .await?;
        let system_prompt = self.system_prompt().await;

        let turn = self.agent.run_turn(&system_prompt, &history, prompt).await;

        let id = self.history.write_log(source, &turn.log).await?;
        Ok(TurnReceipt {
            id,
            reply: turn.reply,
        })
    }
}

/// Parse a user-facing conversation reference: `C42`, `c42`, or `42`.
pub fn parse_reference(reference: &str) -> anyhow::Result<i64> {
    let digits = reference
        .strip_prefix('C')
        .or_else(|| reference.strip_prefix('c'))
        .unwrap_or(reference);
    digits
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Malformed conversation reference '{reference}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_accepts_bare_and_prefixed_ids() {
        assert_eq!(parse_reference("42").unwrap(), 42);
        assert_eq!(parse_reference("C42").unwrap(), 42);
        assert_eq!(parse_reference("c7").unwrap(), 7);
    }

    #[test]
    fn reference_rejects_garbage() {
        assert!(parse_reference("").is_err());
        assert!(parse_reference("Cxyz").is_err());
        assert!(parse_reference("4 2").is_err());
    }
}
