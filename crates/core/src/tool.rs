//! Tool trait and registries — the agent's capabilities.
//!
//! Two disjoint registries exist at runtime: the trusted set (notes,
//! calendar, plus read-only lookups) and the untrusted set (read-only
//! lookups only). A registry is selected per loop and the two are never
//! merged; which registry a loop holds is the capability decision.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use std::collections::HashMap;

/// The capability class a registry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Full tool set, including note-editing and calendar mutation.
    Trusted,
    /// Read-only lookups only; handed to the delegated sub-agent.
    Untrusted,
}

/// The core Tool trait.
///
/// Each tool implements this trait and is registered in a ToolRegistry.
/// Arguments arrive as a JSON value; when the model produced arguments that
/// were not valid JSON, the dispatch boundary forwards the raw text as a
/// JSON string value.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "get_weather").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value)
    -> std::result::Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools with a fixed capability class.
pub struct ToolRegistry {
    capability: Capability,
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            tools: HashMap::new(),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        // HashMap iteration order is arbitrary; keep the schema list stable.
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
