//! SQLite history backend.
//!
//! A single database file with one `turns` table. Each row holds the
//! source, the turn's first prompt and final response (for cheap history
//! seeding), and the full formatted log text (for verbatim display and
//! replay). The schema is created automatically on open.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use steward_core::entry::{Conversation, Exchange};
use steward_core::error::StoreError;
use steward_core::history::HistoryStore;
use tracing::{debug, info};

/// A SQLite-backed history store.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Open (or create) the history database at `path`.
    ///
    /// Pass `":memory:"` for an in-process ephemeral database (useful for
    /// tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // One connection: turns are written one at a time, and an
        // in-memory database must not be split across connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("History store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turns (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                source     TEXT NOT NULL,
                prompt     TEXT NOT NULL,
                response   TEXT NOT NULL,
                content    TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("turns table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_turns_source ON turns(source, id)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("source index: {e}")))?;

        debug!("History migrations complete");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn write_log(
        &self,
        source: &str,
        conversation: &Conversation,
    ) -> Result<i64, StoreError> {
        let content = steward_transcript::format(conversation.entries());
        let prompt = conversation.first_prompt().unwrap_or_default();
        let response = conversation.last_response().unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO turns (source, prompt, response, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(source)
        .bind(prompt)
        .bind(response)
        .bind(&content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("insert turn: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(source, id, entries = conversation.len(), "Turn persisted");
        Ok(id)
    }

    async fn read_log(&self, id: i64) -> Result<Conversation, StoreError> {
        let text = self.read_log_text(id).await?;
        Ok(Conversation::from_entries(steward_transcript::parse(&text)))
    }

    async fn read_log_text(&self, id: i64) -> Result<String, StoreError> {
        let row = sqlx::query("SELECT content FROM turns WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("select turn: {e}")))?
            .ok_or(StoreError::NotFound(id))?;

        row.try_get::<String, _>("content")
            .map_err(|e| StoreError::Storage(format!("read content column: {e}")))
    }

    async fn recent_exchanges(
        &self,
        source: &str,
        limit: usize,
    ) -> Result<Vec<Exchange>, StoreError> {
        let rows = sqlx::query(
            "SELECT prompt, response FROM turns
             WHERE source = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(source)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("select history: {e}")))?;

        // Query returns newest-first; callers want oldest-first.
        let mut exchanges: Vec<Exchange> = rows
            .iter()
            .map(|row| {
                Ok(Exchange {
                    user: row
                        .try_get("prompt")
                        .map_err(|e| StoreError::Storage(e.to_string()))?,
                    assistant: row
                        .try_get("response")
                        .map_err(|e| StoreError::Storage(e.to_string()))?,
                })
            })
            .collect::<Result<_, StoreError>>()?;
        exchanges.reverse();
        Ok(exchanges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_core::entry::ConversationEntry as E;

    async fn store() -> SqliteHistory {
        SqliteHistory::new(":memory:").await.unwrap()
    }

    fn turn(prompt: &str, response: &str) -> Conversation {
        let mut conv = Conversation::new();
        conv.push(E::prompt(prompt));
        conv.push(E::response(response));
        conv
    }

    #[tokio::test]
    async fn write_then_read_roundtrips_entries() {
        let store = store().await;
        let mut conv = turn("weather?", "sunny");
        conv.push(E::tool_input("get_weather", "{}"));
        conv.push(E::tool_output("get_weather", "sunny", 3));

        let id = store.write_log("cli", &conv).await.unwrap();
        let loaded = store.read_log(id).await.unwrap();
        assert_eq!(loaded, conv);
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = store().await;
        let a = store.write_log("cli", &turn("a", "1")).await.unwrap();
        let b = store.write_log("cli", &turn("b", "2")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = store().await;
        let err = store.read_log(999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[tokio::test]
    async fn recent_exchanges_oldest_first_and_limited() {
        let store = store().await;
        for i in 1..=4 {
            store
                .write_log("cli", &turn(&format!("q{i}"), &format!("a{i}")))
                .await
                .unwrap();
        }

        let recent = store.recent_exchanges("cli", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user, "q3");
        assert_eq!(recent[1].user, "q4");
    }

    #[tokio::test]
    async fn sources_partition_history() {
        let store = store().await;
        store.write_log("cli", &turn("cli q", "cli a")).await.unwrap();
        store
            .write_log("discord:123", &turn("dq", "da"))
            .await
            .unwrap();

        let cli = store.recent_exchanges("cli", 10).await.unwrap();
        assert_eq!(cli.len(), 1);
        assert_eq!(cli[0].user, "cli q");

        let discord = store.recent_exchanges("discord:123", 10).await.unwrap();
        assert_eq!(discord.len(), 1);
        assert_eq!(discord[0].assistant, "da");
    }

    #[tokio::test]
    async fn stored_text_is_verbatim_format() {
        let store = store().await;
        let conv = turn("hello", "hi");
        let id = store.write_log("cli", &conv).await.unwrap();
        let text = store.read_log_text(id).await.unwrap();
        assert_eq!(text, steward_transcript::format(conv.entries()));
    }
}
