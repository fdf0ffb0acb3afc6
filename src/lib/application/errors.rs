use super::tooling::ProtocolError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no tool server yielded any tools for session '{session_id}'")]
    NoToolServersAvailable { session_id: String },
    #[error("session '{session_id}' not found")]
    NotFound { session_id: String },
}

/// Failures of a single turn. History is restored before any of these is
/// returned.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("tool '{tool}' is not offered by any connected server")]
    UnknownTool { tool: String },
    #[error("calling tool '{tool}' failed: {source}")]
    ToolDispatchFailed {
        tool: String,
        #[source]
        source: ProtocolError,
    },
    #[error("model call failed: {0}")]
    LlmCallFailed(#[from] ModelError),
}

impl TurnError {
    pub fn user_message(&self) -> String {
        match self {
            TurnError::UnknownTool { tool } => {
                format!("Tool {tool} not found in any connected server")
            }
            TurnError::ToolDispatchFailed { source, .. } => {
                format!("Failed to call tool: {}", source.remote_message())
            }
            TurnError::LlmCallFailed(err) => err.user_message(),
        }
    }
}
