//! Built-in tool implementations for steward.
//!
//! Two registries are built here and never merged:
//!
//! - the **trusted** registry: everything, including note editing and
//!   calendar mutation (the latter only when the config flag allows);
//! - the **untrusted** registry: read-only lookups (weather, web search,
//!   web fetch) handed to the delegated sub-agent.

pub mod calendar;
pub mod notes;
pub mod weather;
pub mod web_fetch;
pub mod web_search;

use std::path::PathBuf;
use steward_core::tool::{Capability, ToolRegistry};

/// File locations the trusted tools operate on.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub notes: PathBuf,
    pub calendar: PathBuf,
}

/// Build the trusted tool registry.
///
/// `allow_calendar_writes` gates registration of the calendar-mutating
/// tools; listing is always available.
pub fn trusted_registry(paths: &ToolPaths, allow_calendar_writes: bool) -> ToolRegistry {
    let mut registry = ToolRegistry::new(Capability::Trusted);
    registry.register(Box::new(weather::GetWeatherTool));
    registry.register(Box::new(web_search::WebSearchTool));
    registry.register(Box::new(web_fetch::WebFetchTool::new()));
    registry.register(Box::new(notes::ReadNotesTool::new(paths.notes.clone())));
    registry.register(Box::new(notes::AppendNoteTool::new(paths.notes.clone())));
    registry.register(Box::new(notes::ReplaceNotesTool::new(paths.notes.clone())));
    registry.register(Box::new(calendar::ListCalendarEventsTool::new(
        paths.calendar.clone(),
    )));
    if allow_calendar_writes {
        registry.register(Box::new(calendar::CreateCalendarEventTool::new(
            paths.calendar.clone(),
        )));
        registry.register(Box::new(calendar::DeleteCalendarEventTool::new(
            paths.calendar.clone(),
        )));
    }
    registry
}

/// Build the untrusted tool registry: read-only lookups only.
///
/// Note-editing and calendar tools must never appear here.
pub fn untrusted_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new(Capability::Untrusted);
    registry.register(Box::new(weather::GetWeatherTool));
    registry.register(Box::new(web_search::WebSearchTool));
    registry.register(Box::new(web_fetch::WebFetchTool::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(dir: &tempfile::TempDir) -> ToolPaths {
        ToolPaths {
            notes: dir.path().join("notes.md"),
            calendar: dir.path().join("calendar.json"),
        }
    }

    #[test]
    fn trusted_registry_has_full_set() {
        let dir = tempfile::tempdir().unwrap();
        let registry = trusted_registry(&paths(&dir), true);
        assert_eq!(
            registry.names(),
            vec![
                "append_note",
                "create_calendar_event",
                "delete_calendar_event",
                "get_weather",
                "list_calendar_events",
                "read_notes",
                "replace_notes",
                "web_fetch",
                "web_search",
            ]
        );
        assert_eq!(registry.capability(), Capability::Trusted);
    }

    #[test]
    fn calendar_writes_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let registry = trusted_registry(&paths(&dir), false);
        assert!(registry.get("list_calendar_events").is_some());
        assert!(registry.get("create_calendar_event").is_none());
        assert!(registry.get("delete_calendar_event").is_none());
    }

    #[test]
    fn untrusted_registry_is_read_only_lookups() {
        let registry = untrusted_registry();
        assert_eq!(registry.names(), vec!["get_weather", "web_fetch", "web_search"]);
        assert_eq!(registry.capability(), Capability::Untrusted);

        // The trust boundary depends on these never being registered.
        assert!(registry.get("append_note").is_none());
        assert!(registry.get("replace_notes").is_none());
        assert!(registry.get("read_notes").is_none());
        assert!(registry.get("create_calendar_event").is_none());
        assert!(registry.get("delete_calendar_event").is_none());
    }
}
