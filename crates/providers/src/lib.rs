//! Model transport implementations for steward.
//!
//! All transports implement the `steward_core::ChatProvider` trait. The
//! agent loops never know which backend is in use.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
