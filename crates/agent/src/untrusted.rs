//! The untrusted sub-agent loop.
//!
//! Structurally the same model/tool cycle as the trusted loop, but seeded
//! with only a fixed generic system prompt and the delegated task — never
//! the trusted conversation, prior history, or the user's notes — and
//! restricted to the read-only untrusted tool registry.
//!
//! Its tool calls and results are appended to the trusted conversation's
//! log for audit, but they are never re-injected as messages into the
//! trusted context: the only value that crosses back is the final answer
//! string returned from [`SubagentLoop::run`].

use crate::config::AgentConfig;
use crate::context::{Context, Untrusted};
use crate::dispatch::{canonicalize_arguments, dispatch};
use crate::prompt::SUBAGENT_SYSTEM_PROMPT;
use std::sync::Arc;
use steward_core::chat::ChatMessage;
use steward_core::entry::{Conversation, ConversationEntry};
use steward_core::provider::{ChatProvider, ChatRequest};
use steward_core::tool::ToolRegistry;
use tracing::{debug, warn};

/// Reply when the model transport fails mid-delegation.
pub const SUBAGENT_UNAVAILABLE_REPLY: &str =
    "Error: the delegated task failed because the language model was unreachable.";

/// Reply when the sub-agent exhausts its iteration budget.
pub const SUBAGENT_LIMIT_REPLY: &str =
    "Error: the delegated task needed more tool steps than allowed in a single run.";

pub struct SubagentLoop {
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl SubagentLoop {
    /// `tools` must be the untrusted registry; the capability tag is the
    /// caller's promise that no note-editing or calendar-mutating tool is
    /// reachable from here.
    pub fn new(provider: Arc<dyn ChatProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        debug_assert_eq!(tools.capability(), steward_core::tool::Capability::Untrusted);
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Run the delegated task to completion and return its final answer.
    ///
    /// `audit_log` is the trusted conversation's log; every entry the
    /// sub-agent produces (including its final response) is appended there
    /// for transparency.
    pub async fn run(&self, task: &str, audit_log: &mut Conversation) -> String {
        debug!(task_len = task.len(), "Sub-agent run starting");

        let mut ctx: Context<Untrusted> = Context::new(vec![
            ChatMessage::system(SUBAGENT_SYSTEM_PROMPT),
            ChatMessage::user(task),
        ]);
        let schemas = self.tools.definitions();

        for iteration in 1..=self.config.max_iterations {
            let request = ChatRequest {
                model: self.config.model.clone(),
                messages: ctx.messages().to_vec(),
                tools: schemas.clone(),
                temperature: self.config.temperature,
                max_tokens: None,
            };

            let turn = match self.provider.complete(request).await {
                Ok(turn) => turn,
                Err(e) => {
                    warn!(error = %e, "Sub-agent model call failed");
                    audit_log.push(ConversationEntry::response(SUBAGENT_UNAVAILABLE_REPLY));
                    return SUBAGENT_UNAVAILABLE_REPLY.to_string();
                }
            };

            if turn.is_final() {
                audit_log.push(ConversationEntry::response(&turn.content));
                return turn.content;
            }

            if !turn.content.is_empty() {
                audit_log.push(ConversationEntry::response(&turn.content));
            }
            ctx.push(ChatMessage::assistant_with_calls(
                &turn.content,
                turn.tool_calls.clone(),
            ));

            debug!(
                iteration,
                calls = turn.tool_calls.len(),
                "Sub-agent executing tool calls"
            );

            for call in &turn.tool_calls {
                audit_log.push(ConversationEntry::tool_input(
                    &call.name,
                    canonicalize_arguments(&call.arguments),
                ));
                let outcome = dispatch(&self.tools, &call.name, &call.arguments).await;
                audit_log.push(ConversationEntry::tool_output(
                    &call.name,
                    &outcome.content,
                    outcome.duration_ms,
                ));
                ctx.push(ChatMessage::tool_result(&call.id, &outcome.content));
            }
        }

        warn!(
            limit = self.config.max_iterations,
            "Sub-agent hit iteration limit"
        );
        audit_log.push(ConversationEntry::response(SUBAGENT_LIMIT_REPLY));
        SUBAGENT_LIMIT_REPLY.to_string()
    }
}
