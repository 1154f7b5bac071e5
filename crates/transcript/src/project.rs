//! Projection of log entries into the message list a model call needs.
//!
//! Used identically for two things: seeding a live turn from stored
//! exchanges, and replaying a historical conversation so the model can
//! regenerate its answer.
//!
//! The model API represents "one assistant turn that made N tool calls" as
//! a single assistant message carrying N call descriptors followed by N
//! tool-result messages — never as N separate assistant messages. Log
//! entries are flat and per-call, so replay re-batches consecutive tool
//! entries into that shape.

use steward_core::chat::{ChatMessage, ToolCall};
use steward_core::entry::{ConversationEntry, Exchange};

/// Placeholder result for a tool input whose output was never recorded
/// (e.g. a log truncated mid-turn).
pub const NO_OUTPUT_RECORDED: &str = "(no output recorded)";

/// Build the seed message list for a live turn: system prompt, the stored
/// exchanges oldest-first, then the new user prompt.
pub fn seed_messages(system_prompt: &str, history: &[Exchange], prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt));
    for exchange in history {
        messages.push(ChatMessage::user(&exchange.user));
        messages.push(ChatMessage::assistant(&exchange.assistant));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

/// Project a recorded entry sequence into replay messages.
///
/// `Response` entries are deliberately skipped: replay asks the model to
/// recompute its answer, and including the recorded response would make it
/// reproduce rather than recompute. Tool-call ids are minted fresh
/// (`replay_<n>`) and are scoped to this projection only.
pub fn replay_messages(system_prompt: &str, entries: &[ConversationEntry]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt)];
    let mut next_call = 0usize;
    let mut i = 0;

    while i < entries.len() {
        match &entries[i] {
            ConversationEntry::Prompt { content } => {
                messages.push(ChatMessage::user(content));
                i += 1;
            }
            ConversationEntry::Response { .. } => {
                i += 1;
            }
            ConversationEntry::ToolOutput { .. } => {
                // An output with no preceding unconsumed input; should not
                // occur in well-formed logs.
                i += 1;
            }
            ConversationEntry::ToolInput { .. } => {
                let (calls, results, consumed) = collect_call_run(&entries[i..], &mut next_call);
                messages.push(ChatMessage::assistant_with_calls(String::new(), calls));
                for (id, content) in results {
                    messages.push(ChatMessage::tool_result(id, content));
                }
                i += consumed;
            }
        }
    }

    messages
}

/// Collect a run of consecutive tool inputs (each optionally followed by
/// its matching output) starting at `entries[0]`, which must be a
/// `ToolInput`. Returns the call descriptors, the per-call result contents
/// in call order, and how many entries were consumed.
fn collect_call_run(
    entries: &[ConversationEntry],
    next_call: &mut usize,
) -> (Vec<ToolCall>, Vec<(String, String)>, usize) {
    let mut calls = Vec::new();
    let mut results = Vec::new();
    let mut i = 0;

    while let Some(ConversationEntry::ToolInput { name, content }) = entries.get(i) {
        let id = format!("replay_{next_call}");
        *next_call += 1;
        calls.push(ToolCall {
            id: id.clone(),
            name: name.clone(),
            arguments: content.clone(),
        });

        match entries.get(i + 1) {
            Some(ConversationEntry::ToolOutput {
                name: out_name,
                content: out_content,
                ..
            }) if out_name == name => {
                results.push((id, out_content.clone()));
                i += 2;
            }
            _ => {
                results.push((id, NO_OUTPUT_RECORDED.to_string()));
                i += 1;
            }
        }
    }

    (calls, results, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_core::entry::ConversationEntry as E;

    fn assert_user(msg: &ChatMessage, expected: &str) {
        match msg {
            ChatMessage::User { content } => assert_eq!(content, expected),
            other => panic!("expected user message, got {other:?}"),
        }
    }

    #[test]
    fn responses_are_skipped() {
        let msgs = replay_messages("system prompt", &[E::prompt("hello"), E::response("hi there")]);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0], ChatMessage::system("system prompt"));
        assert_user(&msgs[1], "hello");
    }

    #[test]
    fn single_tool_pair_projects_to_assistant_plus_tool() {
        let msgs = replay_messages(
            "sys",
            &[
                E::prompt("What's the weather?"),
                E::tool_input("get_weather", r#"{"location":"London"}"#),
                E::tool_output("get_weather", "Partly cloudy", 100),
                E::response("It's partly cloudy"),
            ],
        );
        assert_eq!(msgs.len(), 4);

        let ChatMessage::Assistant { tool_calls, .. } = &msgs[2] else {
            panic!("expected assistant message, got {:?}", msgs[2]);
        };
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].name, "get_weather");
        assert_eq!(tool_calls[0].arguments, r#"{"location":"London"}"#);

        let ChatMessage::Tool {
            content,
            tool_call_id,
        } = &msgs[3]
        else {
            panic!("expected tool message, got {:?}", msgs[3]);
        };
        assert_eq!(content, "Partly cloudy");
        assert_eq!(tool_call_id, &tool_calls[0].id);
    }

    #[test]
    fn consecutive_pairs_batch_into_one_assistant_message() {
        let msgs = replay_messages(
            "sys",
            &[
                E::prompt("weather and calendar please"),
                E::tool_input("get_weather", "{}"),
                E::tool_output("get_weather", "sunny", 1),
                E::tool_input("list_calendar_events", "{}"),
                E::tool_output("list_calendar_events", "standup at 9", 2),
                E::response("sunny; you have standup at 9"),
            ],
        );
        // system, user, assistant(2 calls), tool, tool
        assert_eq!(msgs.len(), 5);

        let ChatMessage::Assistant { tool_calls, .. } = &msgs[2] else {
            panic!("expected assistant message");
        };
        assert_eq!(tool_calls.len(), 2);
        assert_eq!(tool_calls[0].name, "get_weather");
        assert_eq!(tool_calls[1].name, "list_calendar_events");

        for (k, msg) in msgs[3..5].iter().enumerate() {
            let ChatMessage::Tool { tool_call_id, .. } = msg else {
                panic!("expected tool message");
            };
            assert_eq!(tool_call_id, &tool_calls[k].id);
        }
    }

    #[test]
    fn missing_output_is_synthesized() {
        let msgs = replay_messages(
            "sys",
            &[E::prompt("hi"), E::tool_input("web_search", "{\"query\":\"x\"}")],
        );
        assert_eq!(msgs.len(), 4);
        let ChatMessage::Tool { content, .. } = &msgs[3] else {
            panic!("expected tool message");
        };
        assert_eq!(content, NO_OUTPUT_RECORDED);
    }

    #[test]
    fn orphan_output_is_skipped() {
        let msgs = replay_messages(
            "sys",
            &[E::tool_output("get_weather", "sunny", 1), E::prompt("hi")],
        );
        assert_eq!(msgs.len(), 2);
        assert_user(&msgs[1], "hi");
    }

    #[test]
    fn replay_ids_are_unique_across_runs() {
        let msgs = replay_messages(
            "sys",
            &[
                E::tool_input("get_weather", "{}"),
                E::tool_output("get_weather", "sunny", 1),
                E::prompt("and tomorrow?"),
                E::tool_input("get_weather", "{}"),
                E::tool_output("get_weather", "rain", 1),
            ],
        );
        let mut ids = Vec::new();
        for msg in &msgs {
            if let ChatMessage::Assistant { tool_calls, .. } = msg {
                ids.extend(tool_calls.iter().map(|c| c.id.clone()));
            }
        }
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.starts_with("replay_")));
    }

    #[test]
    fn mismatched_output_name_does_not_pair() {
        let msgs = replay_messages(
            "sys",
            &[
                E::tool_input("get_weather", "{}"),
                E::tool_output("web_search", "results", 1),
            ],
        );
        // assistant(1 call) + synthesized tool result; the mismatched
        // output is then skipped as an orphan.
        assert_eq!(msgs.len(), 3);
        let ChatMessage::Tool { content, .. } = &msgs[2] else {
            panic!("expected tool message");
        };
        assert_eq!(content, NO_OUTPUT_RECORDED);
    }

    #[test]
    fn seed_interleaves_history_pairs() {
        let history = vec![
            Exchange {
                user: "first question".into(),
                assistant: "first answer".into(),
            },
            Exchange {
                user: "second question".into(),
                assistant: "second answer".into(),
            },
        ];
        let msgs = seed_messages("sys", &history, "third question");
        assert_eq!(msgs.len(), 6);
        assert_eq!(msgs[0], ChatMessage::system("sys"));
        assert_user(&msgs[1], "first question");
        assert_eq!(msgs[2], ChatMessage::assistant("first answer"));
        assert_user(&msgs[5], "third question");
    }

    #[test]
    fn message_count_depends_only_on_prompts_and_inputs() {
        // Replay skip invariant: adding responses never changes the length.
        let without = replay_messages("s", &[E::prompt("a")]);
        let with = replay_messages(
            "s",
            &[E::prompt("a"), E::response("r1"), E::response("r2")],
        );
        assert_eq!(without.len(), with.len());
    }
}
