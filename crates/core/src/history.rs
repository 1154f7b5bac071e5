//! HistoryStore trait — the persistence contract for completed turns.
//!
//! One row per completed turn. Rows are append-only: no deletion or
//! mutation path exists. The returned row id is the user-facing
//! conversation reference (`C<id>`).

use crate::entry::{Conversation, Exchange};
use crate::error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a completed turn for `source` and return its id.
    ///
    /// `source` partitions independent conversations (e.g. one per Discord
    /// channel, one flat stream for the CLI).
    async fn write_log(
        &self,
        source: &str,
        conversation: &Conversation,
    ) -> std::result::Result<i64, StoreError>;

    /// Load a stored turn back into its entry sequence.
    async fn read_log(&self, id: i64) -> std::result::Result<Conversation, StoreError>;

    /// The raw formatted log text as stored, for verbatim display.
    async fn read_log_text(&self, id: i64) -> std::result::Result<String, StoreError>;

    /// The last `limit` exchanges for `source`, oldest-first.
    async fn recent_exchanges(
        &self,
        source: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Exchange>, StoreError>;
}
