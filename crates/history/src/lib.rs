//! Conversation history persistence for steward.
//!
//! One SQLite row per completed turn, partitioned by source. Rows are
//! append-only; the rowid doubles as the user-facing conversation
//! reference (`C<id>`).

pub mod sqlite;

pub use sqlite::SqliteHistory;
