//! Model types - Request, Response, and Error types

use crate::types::{ChatMessage, ContentBlock, ToolFunctionSchema};
use thiserror::Error;

/// One completion call. The full conversation travels every time; providers
/// keep no conversation state.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    /// Empty means the model is offered no tools.
    pub tools: Vec<ToolFunctionSchema>,
}

/// Model response, as ordered content blocks
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

impl ModelResponse {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            stop_reason: None,
        }
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' answered {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => {
                format!("Model provider '{provider}' has no API key configured.")
            }
            ModelError::Network { provider, source } => {
                if source.is_timeout() {
                    format!("Request to model provider '{provider}' timed out.")
                } else if source.is_connect() {
                    format!("Could not connect to model provider '{provider}'.")
                } else {
                    format!("Network error talking to model provider '{provider}'.")
                }
            }
            ModelError::Api { status, body, .. } => {
                let snippet: String = body.chars().take(200).collect();
                format!("Model provider returned HTTP {status}: {snippet}")
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Model provider '{provider}' returned an invalid response.")
            }
        }
    }
}
