//! End-to-end integration tests for the steward assistant.
//!
//! These tests exercise the full pipeline from user prompt to stored
//! transcript: loop execution, tool dispatch, delegation, history
//! persistence, and the codec/projection round trip.

use std::sync::Arc;

use async_trait::async_trait;
use steward_agent::{
    AgentConfig, DELEGATE_TOOL, SubagentLoop, TrustedLoop, trusted_system_prompt,
};
use steward_core::chat::{ChatMessage, ToolCall};
use steward_core::entry::ConversationEntry;
use steward_core::error::ProviderError;
use steward_core::history::HistoryStore;
use steward_core::provider::{ChatProvider, ChatRequest, ModelTurn};
use steward_history::SqliteHistory;
use steward_tools::{ToolPaths, trusted_registry, untrusted_registry};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A provider that returns scripted turns in sequence and records every
/// request it receives.
struct ScriptedProvider {
    turns: std::sync::Mutex<Vec<ModelTurn>>,
    requests: std::sync::Mutex<Vec<ChatRequest>>,
    call_count: std::sync::Mutex<usize>,
}

impl ScriptedProvider {
    fn new(turns: Vec<ModelTurn>) -> Self {
        Self {
            turns: std::sync::Mutex::new(turns),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn text(answer: &str) -> Self {
        Self::new(vec![text_turn(answer)])
    }

    fn tool_then_text(calls: Vec<ToolCall>, thought: &str, answer: &str) -> Self {
        Self::new(vec![tool_turn(calls, thought), text_turn(answer)])
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ModelTurn, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let mut count = self.call_count.lock().unwrap();
        let turns = self.turns.lock().unwrap();
        if *count >= turns.len() {
            panic!("ScriptedProvider exhausted: call #{}, have {}", *count, turns.len());
        }
        let turn = turns[*count].clone();
        *count += 1;
        Ok(turn)
    }
}

fn text_turn(text: &str) -> ModelTurn {
    ModelTurn {
        content: text.into(),
        tool_calls: vec![],
    }
}

fn tool_turn(calls: Vec<ToolCall>, thought: &str) -> ModelTurn {
    ModelTurn {
        content: thought.into(),
        tool_calls: calls,
    }
}

fn make_call(name: &str, args: serde_json::Value) -> ToolCall {
    ToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}

fn make_paths(dir: &tempfile::TempDir) -> ToolPaths {
    ToolPaths {
        notes: dir.path().join("notes.md"),
        calendar: dir.path().join("calendar.json"),
    }
}

fn make_agent(
    provider: Arc<ScriptedProvider>,
    sub_provider: Arc<ScriptedProvider>,
    paths: &ToolPaths,
) -> TrustedLoop {
    let config = AgentConfig::default();
    let subagent = SubagentLoop::new(sub_provider, Arc::new(untrusted_registry()), config.clone());
    TrustedLoop::new(
        provider,
        Arc::new(trusted_registry(paths, true)),
        subagent,
        config,
    )
}

// ── E2E: Tool Turn to Stored Transcript ──────────────────────────────────

#[tokio::test]
async fn e2e_weather_turn_persists_and_roundtrips() {
    // Scenario: user asks about the weather, the agent calls get_weather,
    // answers, and the turn is persisted and read back losslessly.
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);

    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_call("get_weather", serde_json::json!({"location": "London"}))],
        "Let me check the weather.",
        "Here is the London weather.",
    ));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider.clone(), sub_provider, &paths);

    let turn = agent
        .run_turn("You are steward.", &[], "What's the weather in London?")
        .await;
    assert_eq!(turn.reply, "Here is the London weather.");
    assert_eq!(provider.calls(), 2);

    // Log shape: prompt, intermediate response, tool pair, final response.
    let entries = turn.log.entries();
    assert_eq!(entries.len(), 5);
    assert!(matches!(
        &entries[2],
        ConversationEntry::ToolInput { name, content }
            if name == "get_weather" && content.contains("London")
    ));
    assert!(matches!(
        &entries[3],
        ConversationEntry::ToolOutput { name, .. } if name == "get_weather"
    ));

    // Persist, read back, and verify the codec round trip through storage.
    let store = SqliteHistory::new(":memory:").await.unwrap();
    let id = store.write_log("cli", &turn.log).await.unwrap();
    assert!(id > 0);

    let loaded = store.read_log(id).await.unwrap();
    assert_eq!(loaded, turn.log);

    // The stored text is exactly what `show` prints.
    let text = store.read_log_text(id).await.unwrap();
    assert_eq!(text, steward_transcript::format(turn.log.entries()));
    assert!(text.contains("Tool Input name=get_weather:"));
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn e2e_direct_answer_no_tools() {
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);

    let provider = Arc::new(ScriptedProvider::text("Hello! How can I help?"));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider.clone(), sub_provider, &paths);

    let turn = agent.run_turn("You are steward.", &[], "hi").await;
    assert_eq!(turn.reply, "Hello! How can I help?");
    assert_eq!(provider.calls(), 1);
    assert_eq!(turn.log.len(), 2);
}

// ── E2E: Notes Through the Loop ──────────────────────────────────────────

#[tokio::test]
async fn e2e_note_append_hits_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);

    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_call("append_note", serde_json::json!({"text": "buy milk"}))],
        "",
        "Noted.",
    ));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider, sub_provider, &paths);

    let turn = agent
        .run_turn("You are steward.", &[], "note down: buy milk")
        .await;
    assert_eq!(turn.reply, "Noted.");

    let notes = tokio::fs::read_to_string(&paths.notes).await.unwrap();
    assert_eq!(notes, "buy milk\n");
}

// ── E2E: Delegation and the Trust Boundary ───────────────────────────────

#[tokio::test]
async fn e2e_delegation_runs_subagent_and_ends_turn() {
    // Scenario: the trusted model delegates a research task; the sub-agent
    // searches the web and answers; that answer ends the turn with no
    // further trusted model call.
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);

    let provider = Arc::new(ScriptedProvider::new(vec![tool_turn(
        vec![make_call(
            DELEGATE_TOOL,
            serde_json::json!({"prompt": "find the latest Rust release"}),
        )],
        "",
    )]));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![
        tool_turn(
            vec![make_call("web_search", serde_json::json!({"query": "rust release"}))],
            "",
        ),
        text_turn("Rust 1.88 is the latest stable release."),
    ]));
    let agent = make_agent(provider.clone(), sub_provider.clone(), &paths);

    let notes = "secret: the user's bank PIN is 1234";
    let system_prompt =
        trusted_system_prompt(chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(), Some(notes));

    let turn = agent
        .run_turn(&system_prompt, &[], "what's the latest rust release?")
        .await;
    assert_eq!(turn.reply, "Rust 1.88 is the latest stable release.");
    assert_eq!(provider.calls(), 1);
    assert_eq!(sub_provider.calls(), 2);

    // The sub-agent's tool activity is audited in the trusted log.
    assert!(turn.log.entries().iter().any(|e| matches!(
        e,
        ConversationEntry::Response { content } if content.starts_with("[subagent] ")
    )));
    assert!(turn.log.entries().iter().any(|e| matches!(
        e,
        ConversationEntry::ToolInput { name, .. } if name == "web_search"
    )));

    // Trust isolation: nothing the sub-agent saw came from the trusted
    // context — not the notes, not the user's prompt.
    for request in sub_provider.requests() {
        let serialized = serde_json::to_string(&request.messages).unwrap();
        assert!(!serialized.contains("1234"));
        assert!(!serialized.contains("latest rust release?"));
        assert_eq!(
            request.messages[1],
            ChatMessage::user("find the latest Rust release")
        );
    }

    // The sub-agent was only offered the read-only tool set.
    for request in sub_provider.requests() {
        let offered: Vec<&str> = request.tools.iter().map(|t| t.name.as_str()).collect();
        assert!(offered.contains(&"web_search"));
        assert!(!offered.contains(&"append_note"));
        assert!(!offered.contains(&"create_calendar_event"));
        assert!(!offered.iter().any(|n| *n == DELEGATE_TOOL));
    }
}

// ── E2E: History Seeding Across Turns ────────────────────────────────────

#[tokio::test]
async fn e2e_history_seeds_the_next_turn() {
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);
    let store = SqliteHistory::new(":memory:").await.unwrap();

    // Turn one.
    let provider = Arc::new(ScriptedProvider::text("I'll remember that."));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider, sub_provider, &paths);
    let first = agent
        .run_turn("You are steward.", &[], "my cat is called Biscuit")
        .await;
    store.write_log("cli", &first.log).await.unwrap();

    // Turn two is seeded with the stored exchange.
    let history = store.recent_exchanges("cli", 2).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user, "my cat is called Biscuit");

    let provider = Arc::new(ScriptedProvider::text("Biscuit, of course."));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider.clone(), sub_provider, &paths);
    let second = agent
        .run_turn("You are steward.", &history, "what's my cat called?")
        .await;
    assert_eq!(second.reply, "Biscuit, of course.");

    let messages = &provider.requests()[0].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1], ChatMessage::user("my cat is called Biscuit"));
    assert_eq!(messages[2], ChatMessage::assistant("I'll remember that."));
}

// ── E2E: Replay of a Stored Conversation ─────────────────────────────────

#[tokio::test]
async fn e2e_replay_projects_stored_log_without_responses() {
    let dir = tempfile::tempdir().unwrap();
    let paths = make_paths(&dir);
    let store = SqliteHistory::new(":memory:").await.unwrap();

    let provider = Arc::new(ScriptedProvider::tool_then_text(
        vec![make_call("get_weather", serde_json::json!({"location": "Oslo"}))],
        "Checking.",
        "Cold, as usual.",
    ));
    let sub_provider = Arc::new(ScriptedProvider::new(vec![]));
    let agent = make_agent(provider, sub_provider, &paths);
    let turn = agent.run_turn("You are steward.", &[], "Oslo weather?").await;
    let id = store.write_log("cli", &turn.log).await.unwrap();

    let loaded = store.read_log(id).await.unwrap();
    let messages = steward_transcript::replay_messages("You are steward.", loaded.entries());

    // system, user, assistant(1 call), tool — no response-derived content.
    assert_eq!(messages.len(), 4);
    assert!(matches!(
        &messages[2],
        ChatMessage::Assistant { tool_calls, .. } if tool_calls.len() == 1
    ));
    let serialized = serde_json::to_string(&messages).unwrap();
    assert!(!serialized.contains("Cold, as usual."));
    assert!(!serialized.contains("Checking."));

    // Replay asks the model with no tools offered; a scripted model gives
    // a fresh answer from the projected messages alone.
    let replay_provider = ScriptedProvider::text("Probably cold.");
    let regenerated = replay_provider
        .complete(ChatRequest {
            model: "mock".into(),
            messages,
            tools: vec![],
            temperature: 0.0,
            max_tokens: None,
        })
        .await
        .unwrap();
    assert_eq!(regenerated.content, "Probably cold.");
}
