//! Transcript handling for steward: the log text codec and the projection
//! of log entries into model-API messages.
//!
//! The codec and projector are deliberately pure functions over
//! `steward-core` types — everything here is deterministic and testable
//! without I/O.

pub mod codec;
pub mod project;

pub use codec::{format, parse};
pub use project::{NO_OUTPUT_RECORDED, replay_messages, seed_messages};
