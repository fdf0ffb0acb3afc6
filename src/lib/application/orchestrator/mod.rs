//! # Conversation Orchestrator
//!
//! Completes one turn: user utterance in, one assistant-visible answer out,
//! with at most one tool round-trip in between.
//!
//! ## Turn flow
//!
//! 1. Append the utterance as a `user` message
//! 2. Ask the model, offering the session's tool catalog
//! 3. Store the non-empty reply blocks as an `assistant` message
//! 4. No `tool_use` block: the joined text is the answer
//! 5. Otherwise dispatch the first `tool_use` to its owning server, store the
//!    `tool_result`, and ask the model once more for the answer
//!
//! A failed turn leaves the history exactly as it was before the turn.

#[cfg(test)]
mod tests;

use super::errors::TurnError;
use super::session::Session;
use super::tooling::ToolServerInterface;
use crate::model::{ModelProvider, ModelRequest};
use crate::types::{ChatMessage, ContentBlock, ToolFunctionSchema};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Placeholder sent to the model when a tool answers with no content.
pub const EMPTY_TOOL_RESULT: &str = "No content returned";

/// Completion parameters shared by every turn.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub response: String,
    pub tool_used: Option<String>,
}

pub struct ConversationOrchestrator<P: ModelProvider> {
    provider: Arc<P>,
    bridge: Arc<dyn ToolServerInterface>,
    settings: TurnSettings,
}

impl<P: ModelProvider> ConversationOrchestrator<P> {
    pub fn new(
        provider: Arc<P>,
        bridge: Arc<dyn ToolServerInterface>,
        settings: TurnSettings,
    ) -> Self {
        Self {
            provider,
            bridge,
            settings,
        }
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// Runs one turn against `session`, which the caller holds exclusively
    /// for the whole call.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let checkpoint = session.history.len();
        let result = self.complete_turn(session, utterance).await;

        match &result {
            Ok(outcome) => info!(
                session_id = session.id.as_str(),
                tool = outcome.tool_used.as_deref(),
                history_len = session.history.len(),
                "Turn completed"
            ),
            Err(err) => {
                session.history.truncate(checkpoint);
                warn!(
                    session_id = session.id.as_str(),
                    error = %err,
                    history_len = checkpoint,
                    "Turn failed, history restored"
                );
            }
        }
        result
    }

    async fn complete_turn(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<TurnOutcome, TurnError> {
        session.history.push(ChatMessage::user(utterance));
        let tools = session.tools.function_schemas();

        debug!(
            session_id = session.id.as_str(),
            history_len = session.history.len(),
            tools = tools.len(),
            "Requesting model reply"
        );
        let reply = self
            .provider
            .chat(self.request(&session.history, tools.clone()))
            .await?;
        let blocks = first_tool_use_only(retain_non_empty(reply.content));
        if !blocks.is_empty() {
            session.history.push(ChatMessage::assistant(blocks.clone()));
        }

        let mut tool_uses = blocks.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        });
        let Some((call_id, tool_name, arguments)) = tool_uses.next() else {
            return Ok(TurnOutcome {
                response: join_text(&blocks),
                tool_used: None,
            });
        };

        let descriptor = session
            .tools
            .find(tool_name)
            .ok_or_else(|| TurnError::UnknownTool {
                tool: tool_name.clone(),
            })?;

        info!(
            session_id = session.id.as_str(),
            tool = tool_name.as_str(),
            endpoint = descriptor.owner_endpoint.as_str(),
            "Dispatching tool call"
        );
        let payload = self
            .bridge
            .call_tool(
                &descriptor.owner_endpoint,
                &session.id,
                tool_name,
                arguments.clone(),
            )
            .await
            .map_err(|source| TurnError::ToolDispatchFailed {
                tool: tool_name.clone(),
                source,
            })?;
        session
            .history
            .push(ChatMessage::tool_result(call_id.clone(), or_placeholder(payload)));

        let follow_up = self
            .provider
            .chat(self.request(&session.history, tools))
            .await?;
        let final_blocks: Vec<ContentBlock> = retain_non_empty(follow_up.content)
            .into_iter()
            .filter(|block| !matches!(block, ContentBlock::ToolUse { .. }))
            .collect();
        let response = join_text(&final_blocks);
        if !final_blocks.is_empty() {
            session.history.push(ChatMessage::assistant(final_blocks));
        }

        Ok(TurnOutcome {
            response,
            tool_used: Some(tool_name.clone()),
        })
    }

    fn request(&self, history: &[ChatMessage], tools: Vec<ToolFunctionSchema>) -> ModelRequest {
        ModelRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: self.settings.system_prompt.clone(),
            messages: history.to_vec(),
            tools,
        }
    }
}

fn retain_non_empty(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    blocks.into_iter().filter(|block| !block.is_empty()).collect()
}

/// A turn makes at most one tool round-trip, so later `tool_use` blocks are
/// dropped before the reply is stored and never left without a result.
fn first_tool_use_only(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut seen_tool_use = false;
    let total = blocks.len();
    let kept: Vec<ContentBlock> = blocks
        .into_iter()
        .filter(|block| match block {
            ContentBlock::ToolUse { .. } => !std::mem::replace(&mut seen_tool_use, true),
            _ => true,
        })
        .collect();
    if kept.len() < total {
        debug!(
            ignored = total - kept.len(),
            "Only the first tool call of a reply is dispatched"
        );
    }
    kept
}

fn join_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_placeholder(payload: Vec<Value>) -> Vec<Value> {
    if payload.is_empty() {
        vec![json!({"type": "text", "text": EMPTY_TOOL_RESULT})]
    } else {
        payload
    }
}
