//! Notes tools — read, append to, and replace the user's notes file.
//!
//! The notes file is a single markdown document the user shares with the
//! assistant. Append and replace are the only write operations; both
//! create the file (and its parent directory) on first use. These tools
//! are trusted-only: the delegated sub-agent never sees them.

use async_trait::async_trait;
use std::path::PathBuf;
use steward_core::error::ToolError;
use steward_core::tool::Tool;
use tracing::debug;

async fn ensure_parent(path: &PathBuf) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "notes".into(),
                reason: format!("Failed to create data directory: {e}"),
            })?;
    }
    Ok(())
}

pub struct ReadNotesTool {
    path: PathBuf,
}

impl ReadNotesTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for ReadNotesTool {
    fn name(&self) -> &str {
        "read_notes"
    }

    fn description(&self) -> &str {
        "Read the user's notes file in full."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok("(no notes yet)".into()),
            Err(e) => Err(ToolError::ExecutionFailed {
                tool_name: "read_notes".into(),
                reason: e.to_string(),
            }),
        }
    }
}

pub struct AppendNoteTool {
    path: PathBuf,
}

impl AppendNoteTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for AppendNoteTool {
    fn name(&self) -> &str {
        "append_note"
    }

    fn description(&self) -> &str {
        "Append a note to the end of the user's notes file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The note text to append"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let text = arguments["text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'text' argument".into()))?;

        ensure_parent(&self.path).await?;

        let mut content = match tokio::fs::read_to_string(&self.path).await {
            Ok(existing) => existing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(ToolError::ExecutionFailed {
                    tool_name: "append_note".into(),
                    reason: e.to_string(),
                });
            }
        };

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(text);
        content.push('\n');

        tokio::fs::write(&self.path, &content)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "append_note".into(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), "Note appended");
        Ok(format!("Appended note ({} chars)", text.len()))
    }
}

pub struct ReplaceNotesTool {
    path: PathBuf,
}

impl ReplaceNotesTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for ReplaceNotesTool {
    fn name(&self) -> &str {
        "replace_notes"
    }

    fn description(&self) -> &str {
        "Replace the entire contents of the user's notes file. Use append_note for additions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The full new contents of the notes file"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let content = arguments["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'content' argument".into()))?;

        ensure_parent(&self.path).await?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "replace_notes".into(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), "Notes replaced");
        Ok(format!("Notes replaced ({} chars)", content.len()))
    }
}
