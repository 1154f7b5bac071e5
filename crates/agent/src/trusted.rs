//! The trusted agent loop — drives one conversation turn.
//!
//! Each turn: send the seeded context to the model; if the turn carries no
//! tool calls, that text is the final answer. Otherwise execute the calls
//! strictly in model order, append the results, and call the model again —
//! up to the configured iteration bound.
//!
//! A `delegate_to_untrusted` call is intercepted before dispatch: the
//! sub-agent runs to completion and its answer becomes this turn's final
//! answer. Remaining calls in the same batch still execute (their results
//! are logged), but no further model call is made once a delegation has
//! occurred.

use crate::config::AgentConfig;
use crate::context::{Context, Trusted};
use crate::dispatch::{canonicalize_arguments, dispatch};
use crate::prompt::{DELEGATE_TOOL, delegate_tool_definition};
use crate::untrusted::SubagentLoop;
use std::sync::Arc;
use steward_core::chat::ChatMessage;
use steward_core::entry::{Conversation, ConversationEntry};
use steward_core::provider::{ChatProvider, ChatRequest};
use steward_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

/// Reply when the model transport fails.
pub const MODEL_UNAVAILABLE_REPLY: &str =
    "I'm sorry — I couldn't reach the language model just now. Please try again in a moment.";

/// Reply when a turn exhausts its iteration budget.
pub const ITERATION_LIMIT_REPLY: &str = "I stopped before finishing: this request needed more \
tool steps than I allow in a single turn. Please try a narrower request.";

/// A finished turn: the full log and the text shown to the user.
#[derive(Debug)]
pub struct CompletedTurn {
    pub log: Conversation,
    pub reply: String,
}

pub struct TrustedLoop {
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    subagent: SubagentLoop,
    config: AgentConfig,
}

impl TrustedLoop {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        subagent: SubagentLoop,
        config: AgentConfig,
    ) -> Self {
        debug_assert_eq!(tools.capability(), steward_core::tool::Capability::Trusted);
        Self {
            provider,
            tools,
            subagent,
            config,
        }
    }

    /// Run one full turn: from user prompt to final textual answer.
    ///
    /// `history` is the stored exchanges seeding the context, oldest-first.
    /// Every entry — prompt, tool inputs/outputs, responses, and any
    /// delegated sub-agent activity — is appended to the returned log in
    /// emission order.
    pub async fn run_turn(
        &self,
        system_prompt: &str,
        history: &[steward_core::entry::Exchange],
        prompt: &str,
    ) -> CompletedTurn {
        info!(prompt_len = prompt.len(), history = history.len(), "Turn starting");

        let mut log = Conversation::new();
        log.push(ConversationEntry::prompt(prompt));

        let mut ctx: Context<Trusted> = Context::new(steward_transcript::seed_messages(
            system_prompt,
            history,
            prompt,
        ));

        let mut schemas = self.tools.definitions();
        schemas.push(delegate_tool_definition());

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
                    warn!(error = %e, "Model call failed, ending turn");
                    log.push(ConversationEntry::response(MODEL_UNAVAILABLE_REPLY));
                    return CompletedTurn {
                        log,
                        reply: MODEL_UNAVAILABLE_REPLY.to_string(),
                    };
                }
            };

            if turn.is_final() {
                log.push(ConversationEntry::response(&turn.content));
                return CompletedTurn {
                    log,
                    reply: turn.content,
                };
            }

            // Text accompanying tool calls is thinking-out-loud, not the
            // final answer; the transcript keeps it.
            if !turn.content.is_empty() {
                log.push(ConversationEntry::response(&turn.content));
            }
            ctx.push(ChatMessage::assistant_with_calls(
                &turn.content,
                turn.tool_calls.clone(),
            ));

            debug!(
                iteration,
                calls = turn.tool_calls.len(),
                "Executing tool calls"
            );

            let mut delegated: Option<String> = None;

            // Strictly sequential, in model order: the appended tool
            // results must align position-for-position with the call list.
            for call in &turn.tool_calls {
                if call.name == DELEGATE_TOOL {
                    let task = delegate_task(&call.arguments);
                    log.push(ConversationEntry::response(format!("[subagent] {task}")));
                    let answer = self.subagent.run(&task, &mut log).await;
                    delegated = Some(answer);
                    continue;
                }

                log.push(ConversationEntry::tool_input(
                    &call.name,
                    canonicalize_arguments(&call.arguments),
                ));
                let outcome = dispatch(&self.tools, &call.name, &call.arguments).await;
                log.push(ConversationEntry::tool_output(
                    &call.name,
                    &outcome.content,
                    outcome.duration_ms,
                ));
                ctx.push(ChatMessage::tool_result(&call.id, &outcome.content));
            }

            // A delegation ends the turn after the batch: the delegated
            // answer overrides whatever the model would have said next.
            if let Some(reply) = delegated {
                info!("Turn resolved by delegation");
                return CompletedTurn { log, reply };
            }
        }

        warn!(
            limit = self.config.max_iterations,
            "Turn hit iteration limit"
        );
        log.push(ConversationEntry::response(ITERATION_LIMIT_REPLY));
        CompletedTurn {
            log,
            reply: ITERATION_LIMIT_REPLY.to_string(),
        }
    }
}

/// Extract the delegated task from the call's arguments; a malformed
/// payload falls back to the raw string.
fn delegate_task(raw_args: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw_args)
        .ok()
        .and_then(|v| v["prompt"].as_str().map(String::from))
        .unwrap_or_else(|| raw_args.to_string())
}
