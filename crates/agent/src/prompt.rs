//! System prompt assembly and the delegation tool definition.

use steward_core::provider::ToolDefinition;

/// Name of the delegation pseudo-tool. It is advertised to the trusted
/// model like any other tool, but the trusted loop intercepts it and runs
/// the sub-agent instead of dispatching it.
pub const DELEGATE_TOOL: &str = "delegate_to_untrusted";

/// The fixed generic system prompt for the delegated sub-agent. It carries
/// no personal context by construction.
pub const SUBAGENT_SYSTEM_PROMPT: &str = "You are a research assistant. Complete the task you \
are given using only the provided tools. Reply with a concise plain-text answer and nothing else.";

const PERSONA: &str = "You are steward, a personal assistant for a single user. You can check \
the weather, search and fetch the web, manage the user's calendar, and keep their notes. Use \
tools when they help; answer directly when they don't. When a task only needs public \
information from the web, delegate it with the delegate_to_untrusted tool instead of browsing \
yourself. Be brief and concrete.";

/// Build the trusted loop's system prompt: persona, the current date, and
/// the user's notes when present. The notes are exactly the personal
/// context the sub-agent must never see.
pub fn trusted_system_prompt(today: chrono::NaiveDate, notes: Option<&str>) -> String {
    let mut prompt = format!("{PERSONA}\n\nToday is {}.", today.format("%A, %Y-%m-%d"));
    if let Some(notes) = notes
        && !notes.trim().is_empty()
    {
        prompt.push_str("\n\n## User notes\n\n");
        prompt.push_str(notes.trim_end());
    }
    prompt
}

/// The delegation tool definition sent to the trusted model.
pub fn delegate_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: DELEGATE_TOOL.to_string(),
        description: "Hand a self-contained research task to an isolated assistant that can \
            look up the weather and read the public web, but has no access to this \
            conversation, the user's notes, or their calendar. Returns its final answer."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "The complete task, with all context the assistant needs"
                }
            },
            "required": ["prompt"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn prompt_includes_date() {
        let prompt = trusted_system_prompt(date(), None);
        assert!(prompt.contains("2026-08-05"));
        assert!(!prompt.contains("## User notes"));
    }

    #[test]
    fn prompt_includes_notes_when_present() {
        let prompt = trusted_system_prompt(date(), Some("likes black coffee\n"));
        assert!(prompt.contains("## User notes"));
        assert!(prompt.contains("likes black coffee"));
    }

    #[test]
    fn empty_notes_are_omitted() {
        let prompt = trusted_system_prompt(date(), Some("   \n"));
        assert!(!prompt.contains("## User notes"));
    }

    #[test]
    fn subagent_prompt_carries_no_personal_context() {
        assert!(!SUBAGENT_SYSTEM_PROMPT.contains("notes"));
        assert!(!SUBAGENT_SYSTEM_PROMPT.contains("calendar"));
    }

    #[test]
    fn delegate_definition_requires_prompt() {
        let def = delegate_tool_definition();
        assert_eq!(def.name, DELEGATE_TOOL);
        assert_eq!(def.parameters["required"][0], "prompt");
    }
}
