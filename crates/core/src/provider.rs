//! ChatProvider trait — the abstraction over the model transport.
//!
//! A provider knows how to send a message list (plus the tool schemas on
//! offer) to a language model and return the model's turn: optional text
//! content and an ordered list of requested tool calls.

use crate::chat::{ChatMessage, ToolCall};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to the model transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g., "gpt-4o-mini").
    pub model: String,

    /// The full message list, system prompt first.
    pub messages: Vec<ChatMessage>,

    /// Tools the model may call. Empty means "no tools offered" — used
    /// during replay.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,

    /// JSON Schema describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// One model turn: text content, tool calls, or both.
///
/// `tool_calls` preserves the order the model produced; the agent loop
/// executes them in exactly that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelTurn {
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ModelTurn {
    /// A turn with no tool calls terminates the agent loop.
    pub fn is_final(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// The model transport trait.
///
/// The agent loops call `complete()` without knowing which backend is in
/// use. Implementations live in `steward-providers`; tests use scripted
/// in-process fakes.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and return the model's turn.
    async fn complete(&self, request: ChatRequest) -> std::result::Result<ModelTurn, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
