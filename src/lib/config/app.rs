use super::error::ConfigError;
use super::provider::ProviderConfig;
use super::server::ServerConfig;
use crate::rpc::types::ClientInfo;
use std::path::Path;
use std::time::Duration;

/// Application configuration resolved from defaults, gateway.toml and the
/// environment, in increasing order of precedence.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub client: ClientInfo,
    pub provider: ProviderConfig,
    pub servers: Vec<ServerConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The gateway cannot talk to the model without a key, so startup
    /// checks this before binding anything.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.provider
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: self.provider.api_key_env.clone(),
            })
    }

    pub fn server_endpoints(&self) -> Vec<String> {
        self.servers.iter().map(|s| s.endpoint.clone()).collect()
    }
}
