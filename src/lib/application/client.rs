use super::errors::{SessionError, TurnError};
use super::orchestrator::{ConversationOrchestrator, TurnOutcome, TurnSettings};
use super::session::{Session, SessionStore};
use super::tooling::{ToolCatalog, ToolServerInterface};
use crate::config::{AppConfig, ServerConfig};
use crate::constants::{
    CLIENT_NAME, CLIENT_VERSION, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::model::ModelProvider;
use crate::rpc::types::ClientInfo;
use crate::types::ToolDescriptor;
use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub servers: Vec<ServerConfig>,
    pub client_info: ClientInfo,
}

impl ClientConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            servers: Vec::new(),
            client_info: ClientInfo {
                name: CLIENT_NAME.to_string(),
                version: CLIENT_VERSION.to_string(),
            },
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.model.clone())
            .with_sampling(config.max_tokens, config.temperature)
            .with_system_prompt(config.system_prompt.clone())
            .with_servers(config.servers.clone())
            .with_client_info(config.client.clone())
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn with_servers(mut self, servers: Vec<ServerConfig>) -> Self {
        self.servers = servers;
        self
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }

    fn turn_settings(&self) -> TurnSettings {
        TurnSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_prompt: self.system_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    /// `false` when the session already existed and nothing was rebuilt.
    pub created: bool,
    pub tools: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Session(SessionError::NotFound { .. }) => StatusCode::NOT_FOUND,
            GatewayError::Session(SessionError::NoToolServersAvailable { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Turn(TurnError::LlmCallFailed(_)) => StatusCode::BAD_GATEWAY,
            GatewayError::Turn(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            GatewayError::InvalidRequest(message) => message.clone(),
            GatewayError::Session(SessionError::NoToolServersAvailable { .. }) => {
                "Failed to connect to any MCP servers".to_string()
            }
            GatewayError::Session(SessionError::NotFound { .. }) => {
                "Session not found. Initialize first.".to_string()
            }
            GatewayError::Turn(err) => err.user_message(),
        }
    }
}

/// Entry point shared by the REST and terminal surfaces: creates sessions
/// and runs turns against them.
pub struct GatewayClient<P: ModelProvider> {
    config: ClientConfig,
    sessions: SessionStore,
    bridge: Arc<dyn ToolServerInterface>,
    orchestrator: ConversationOrchestrator<P>,
}

impl<P: ModelProvider> GatewayClient<P> {
    pub fn new(provider: P, bridge: Arc<dyn ToolServerInterface>, config: ClientConfig) -> Self {
        let orchestrator = ConversationOrchestrator::new(
            Arc::new(provider),
            Arc::clone(&bridge),
            config.turn_settings(),
        );
        Self {
            config,
            sessions: SessionStore::new(),
            bridge,
            orchestrator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client_info(&self) -> &ClientInfo {
        &self.config.client_info
    }

    pub fn server_endpoints(&self) -> Vec<String> {
        self.config
            .servers
            .iter()
            .map(|server| server.endpoint.clone())
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Builds the tool catalog for `session_id` unless the session already
    /// exists. Concurrent calls for one id share a single build.
    pub async fn init_session(&self, session_id: &str) -> Result<InitOutcome, GatewayError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(GatewayError::InvalidRequest("Missing sessionId".into()));
        }

        let bridge = self.bridge.as_ref();
        let servers = self.config.servers.as_slice();
        let client = &self.config.client_info;
        let (handle, created) = self
            .sessions
            .get_or_create(session_id, move || async move {
                let catalog = ToolCatalog::build(bridge, servers, session_id, client).await?;
                Ok::<_, SessionError>(Session::new(session_id, catalog))
            })
            .await?;

        let tools = handle.lock().await.tools.names();
        if created {
            info!(session_id, tool_count = tools.len(), "Session initialized");
        } else {
            debug!(session_id, "Session already exists");
        }
        Ok(InitOutcome { created, tools })
    }

    /// Runs one turn. Turns on the same session queue behind each other;
    /// different sessions run in parallel.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<TurnOutcome, GatewayError> {
        if session_id.trim().is_empty() || message.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "Missing sessionId or message".into(),
            ));
        }

        let handle = self.sessions.require(session_id.trim())?;
        let mut session = handle.lock().await;
        Ok(self.orchestrator.run_turn(&mut session, message).await?)
    }

    pub async fn session_tools(&self, session_id: &str) -> Result<Vec<ToolDescriptor>, GatewayError> {
        let handle = self.sessions.require(session_id)?;
        let session = handle.lock().await;
        Ok(session.tools.tools().to_vec())
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}
