//! Web fetch tool — retrieve a page over HTTP.
//!
//! A plain GET with a response-size cap; the body is returned as text for
//! the model to read. Redirects and TLS are handled by reqwest.

use async_trait::async_trait;
use steward_core::error::ToolError;
use steward_core::tool::Tool;
use tracing::debug;

/// Maximum number of body characters forwarded to the model.
const MAX_BODY_CHARS: usize = 10_000;

pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("steward/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch the contents of a web page by URL. Returns the response status and body text (truncated)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch (http or https)"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let url = arguments["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' argument".into()))?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ToolError::InvalidArguments(
                "URL must start with http:// or https://".into(),
            ));
        }

        debug!(url, "Fetching page");

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "web_fetch".into(),
                    reason: e.to_string(),
                })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_fetch".into(),
                reason: e.to_string(),
            })?;

        let truncated = body.len() > MAX_BODY_CHARS;
        let body: String = body.chars().take(MAX_BODY_CHARS).collect();

        let mut out = format!("HTTP {status}\n\n{body}");
        if truncated {
            out.push_str("\n\n[truncated]");
        }
        Ok(out)
    }
}
