//! Conversation log entries — the atomic units of a recorded turn.
//!
//! A turn is recorded as an ordered sequence of entries: the user's prompt,
//! any tool invocations with their results, and the assistant's responses.
//! Order is the only linkage mechanism between a tool input and its output;
//! no ids are persisted in the log.

use serde::{Deserialize, Serialize};

/// One atomic unit of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationEntry {
    /// The user's input text for this turn.
    Prompt { content: String },

    /// Model-generated text — emitted mid-turn alongside tool calls, or as
    /// the final answer.
    Response { content: String },

    /// A tool invocation request. `content` is the canonicalized argument
    /// payload; the raw string is preserved when it was not valid JSON.
    ToolInput { name: String, content: String },

    /// The result of executing a tool, paired by position with the
    /// immediately preceding `ToolInput`.
    ToolOutput {
        name: String,
        content: String,
        duration_ms: u64,
    },
}

impl ConversationEntry {
    pub fn prompt(content: impl Into<String>) -> Self {
        Self::Prompt {
            content: content.into(),
        }
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self::Response {
            content: content.into(),
        }
    }

    pub fn tool_input(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolInput {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn tool_output(
        name: impl Into<String>,
        content: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self::ToolOutput {
            name: name.into(),
            content: content.into(),
            duration_ms,
        }
    }
}

/// The minimal unit retained for cross-turn history: one user prompt and the
/// assistant's final answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// An ordered, append-only sequence of entries owned by a single turn.
///
/// A conversation is created at the start of a turn, mutated only by
/// appending, and becomes immutable once handed to the history store.
/// A delegated sub-agent run appears inline: a `Response` marker
/// `"[subagent] <task>"` followed by the sub-agent's own entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ConversationEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry. This is the only mutation path.
    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `Prompt` content, if any.
    pub fn first_prompt(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            ConversationEntry::Prompt { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// The last `Response` content, if any.
    pub fn last_response(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e {
            ConversationEntry::Response { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Derive the cross-turn history unit from this conversation: its first
    /// prompt and its last response.
    pub fn exchange(&self) -> Option<Exchange> {
        Some(Exchange {
            user: self.first_prompt()?.to_string(),
            assistant: self.last_response()?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_uses_first_prompt_and_last_response() {
        let mut conv = Conversation::new();
        conv.push(ConversationEntry::prompt("what's the weather?"));
        conv.push(ConversationEntry::response("let me check"));
        conv.push(ConversationEntry::tool_input("get_weather", "{}"));
        conv.push(ConversationEntry::tool_output("get_weather", "sunny", 12));
        conv.push(ConversationEntry::response("It's sunny."));

        let ex = conv.exchange().unwrap();
        assert_eq!(ex.user, "what's the weather?");
        assert_eq!(ex.assistant, "It's sunny.");
    }

    #[test]
    fn exchange_requires_prompt_and_response() {
        let mut conv = Conversation::new();
        conv.push(ConversationEntry::prompt("hello"));
        assert!(conv.exchange().is_none());
    }

    #[test]
    fn entry_serialization_roundtrip() {
        let entry = ConversationEntry::tool_output("web_search", "results", 250);
        let json = serde_json::to_string(&entry).unwrap();
        let back: ConversationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
