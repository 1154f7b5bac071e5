//! Calendar tools — list, create, and delete events in a JSON-file-backed
//! calendar.
//!
//! Events live in a single JSON array on disk. The mutating tools are only
//! registered when the calendar-write config flag allows them; the listing
//! tool is always available to the trusted loop.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use steward_core::error::ToolError;
use steward_core::tool::Tool;
use tracing::debug;

/// Accepted event time formats.
const TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,

    /// Event time, as given by the user (validated against TIME_FORMATS).
    pub when: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

fn validate_when(when: &str) -> Result<(), ToolError> {
    let ok = TIME_FORMATS.iter().any(|fmt| {
        NaiveDateTime::parse_from_str(when, fmt).is_ok()
            || chrono::NaiveDate::parse_from_str(when, fmt).is_ok()
    });
    if ok {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments(format!(
            "Unrecognized event time '{when}'; use YYYY-MM-DD, YYYY-MM-DD HH:MM, or ISO 8601"
        )))
    }
}

async fn load_events(path: &PathBuf) -> Result<Vec<CalendarEvent>, ToolError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            serde_json::from_str(&content).map_err(|e| ToolError::ExecutionFailed {
                tool_name: "calendar".into(),
                reason: format!("Corrupt calendar file: {e}"),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(ToolError::ExecutionFailed {
            tool_name: "calendar".into(),
            reason: e.to_string(),
        }),
    }
}

async fn save_events(path: &PathBuf, events: &[CalendarEvent]) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "calendar".into(),
                reason: format!("Failed to create data directory: {e}"),
            })?;
    }
    let content =
        serde_json::to_string_pretty(events).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "calendar".into(),
            reason: e.to_string(),
        })?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::ExecutionFailed {
            tool_name: "calendar".into(),
            reason: e.to_string(),
        })
}

fn render_events(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "(no events)".into();
    }
    events
        .iter()
        .map(|e| {
            let location = e
                .location
                .as_deref()
                .map(|l| format!(" @ {l}"))
                .unwrap_or_default();
            format!("[{}] {} — {}{}", e.id, e.when, e.title, location)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ListCalendarEventsTool {
    path: PathBuf,
}

impl ListCalendarEventsTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for ListCalendarEventsTool {
    fn name(&self) -> &str {
        "list_calendar_events"
    }

    fn description(&self) -> &str {
        "List all calendar events, sorted by time. Each line shows the event id, time, title, and location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        let mut events = load_events(&self.path).await?;
        events.sort_by(|a, b| a.when.cmp(&b.when));
        Ok(render_events(&events))
    }
}

pub struct CreateCalendarEventTool {
    path: PathBuf,
}

impl CreateCalendarEventTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for CreateCalendarEventTool {
    fn name(&self) -> &str {
        "create_calendar_event"
    }

    fn description(&self) -> &str {
        "Create a new calendar event with a title, a time, and an optional location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "What the event is"
                },
                "when": {
                    "type": "string",
                    "description": "When it happens: YYYY-MM-DD, YYYY-MM-DD HH:MM, or ISO 8601"
                },
                "location": {
                    "type": "string",
                    "description": "Optional location"
                }
            },
            "required": ["title", "when"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let title = arguments["title"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'title' argument".into()))?;
        let when = arguments["when"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'when' argument".into()))?;
        validate_when(when)?;
        let location = arguments["location"].as_str().map(String::from);

        let mut events = load_events(&self.path).await?;
        let id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        events.push(CalendarEvent {
            id,
            title: title.to_string(),
            when: when.to_string(),
            location,
        });
        save_events(&self.path, &events).await?;

        debug!(id, title, "Calendar event created");
        Ok(format!("Created event [{id}] {when} — {title}"))
    }
}

pub struct DeleteCalendarEventTool {
    path: PathBuf,
}

impl DeleteCalendarEventTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for DeleteCalendarEventTool {
    fn name(&self) -> &str {
        "delete_calendar_event"
    }

    fn description(&self) -> &str {
        "Delete a calendar event by its id (as shown by list_calendar_events)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "integer",
                    "description": "The event id to delete"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let id = arguments["id"]
            .as_u64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'id' argument".into()))?;

        let mut events = load_events(&self.path).await?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(ToolError::ExecutionFailed {
                tool_name: "delete_calendar_event".into(),
                reason: format!("No event with id {id}"),
            });
        }
        save_events(&self.path, &events).await?;

        debug!(id, "Calendar event deleted");
        Ok(format!("Deleted event [{id}]"))
    }
}
