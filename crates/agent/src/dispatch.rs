//! The tool dispatch boundary.
//!
//! Maps a model-requested tool name to an executor in the selected
//! registry, runs it, and reports a normalized result string plus elapsed
//! time. An executor error never escapes this boundary — it becomes the
//! content of the tool result so the loop always has a message to forward
//! to the model. Dispatch holds no state across calls.

use std::time::Instant;
use steward_core::tool::ToolRegistry;
use tracing::{debug, warn};

/// The normalized result of one dispatched call.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub content: String,
    pub duration_ms: u64,
}

/// Canonicalize a raw argument string for the log: pretty-print valid
/// JSON, preserve the raw string otherwise.
pub fn canonicalize_arguments(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Execute one tool call against `registry`.
///
/// Argument JSON that fails to parse is retained and forwarded to the
/// executor as a JSON string value rather than rejected.
pub async fn dispatch(registry: &ToolRegistry, name: &str, raw_args: &str) -> DispatchOutcome {
    let started = Instant::now();

    let content = match registry.get(name) {
        None => {
            warn!(tool = name, "Unknown tool requested");
            format!("Error: unknown tool \"{name}\"")
        }
        Some(tool) => {
            let arguments = serde_json::from_str(raw_args)
                .unwrap_or_else(|_| serde_json::Value::String(raw_args.to_string()));

            match tool.execute(arguments).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(tool = name, error = %e, "Tool execution failed");
                    format!("Error in {name}: {e}")
                }
            }
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    debug!(tool = name, duration_ms, "Tool dispatched");

    DispatchOutcome {
        content,
        duration_ms,
    }
}
