//! `steward show <id>` — print a stored transcript verbatim.

use crate::runtime::parse_reference;
use steward_config::AppConfig;
use steward_core::history::HistoryStore;
use steward_history::SqliteHistory;

pub async fn run(reference: &str) -> anyhow::Result<()> {
    let id = parse_reference(reference)?;

    let config = AppConfig::load()?;
    let db_path = config.history_db_path();
    let history = SqliteHistory::new(
        db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("History database path is not valid UTF-8"))?,
    )
    .await?;

    // The stored text already ends with a newline.
    let text = history.read_log_text(id).await?;
    print!("{text}");
    Ok(())
}
