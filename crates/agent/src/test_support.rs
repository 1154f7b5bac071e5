//! Shared fakes for the loop tests: a scripted provider and small tool
//! registries.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use steward_core::error::{ProviderError, ToolError};
use steward_core::provider::{ChatProvider, ChatRequest, ModelTurn};
use steward_core::tool::{Capability, Tool, ToolRegistry};

/// A provider that replays a fixed script of turns and records every
/// request it receives.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ModelTurn, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(turns: Vec<Result<ModelTurn, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(turns.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ModelTurn, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

/// Echoes the `text` argument; reports raw forwarding distinctly.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Echoes the 'text' argument"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "text": { "type": "string" } }
        })
    }
    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        Ok(arguments["text"].as_str().unwrap_or("").to_string())
    }
}

/// Always fails, for error-containment tests.
pub struct BoomTool;

#[async_trait]
impl Tool for BoomTool {
    fn name(&self) -> &str {
        "boom"
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }
    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        Err(ToolError::ExecutionFailed {
            tool_name: "boom".into(),
            reason: "kaboom".into(),
        })
    }
}

/// A trusted registry with `echo` and `boom`.
pub fn test_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new(Capability::Trusted);
    registry.register(Box::new(EchoTool));
    registry.register(Box::new(BoomTool));
    registry
}

/// An untrusted registry with `echo` only.
pub fn untrusted_test_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new(Capability::Untrusted);
    registry.register(Box::new(EchoTool));
    registry
}
