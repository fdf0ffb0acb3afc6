//! # Provider Configuration
//!
//! Connection settings for the Anthropic messages API.
//!
//! ```toml
//! [provider]
//! endpoint = "https://api.anthropic.com"
//! api_key_env = "ANTHROPIC_API_KEY"
//! ```
//!
//! The key itself never lives in the file; only the name of the
//! environment variable holding it does.

use crate::constants::{
    API_KEY_ENV, DEFAULT_ANTHROPIC_API_PATH, DEFAULT_ANTHROPIC_ENDPOINT, DEFAULT_PROVIDER_ID,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: String,
    pub endpoint: String,
    pub api_path: String,
    pub api_key_env: String,
    /// Resolved from `api_key_env` at load time.
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn anthropic(api_key: Option<String>) -> Self {
        Self {
            id: DEFAULT_PROVIDER_ID.to_string(),
            endpoint: DEFAULT_ANTHROPIC_ENDPOINT.to_string(),
            api_path: DEFAULT_ANTHROPIC_API_PATH.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            api_key,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawProviderConfig {
    pub(crate) endpoint: Option<String>,
    pub(crate) api_path: Option<String>,
    pub(crate) api_key_env: Option<String>,
}

impl RawProviderConfig {
    pub(crate) fn resolve<F>(self, lookup_env: F) -> ProviderConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key_env = self.api_key_env.unwrap_or_else(|| API_KEY_ENV.to_string());
        let api_key = lookup_env(&api_key_env).filter(|key| !key.trim().is_empty());
        ProviderConfig {
            id: DEFAULT_PROVIDER_ID.to_string(),
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_ENDPOINT.to_string()),
            api_path: self
                .api_path
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_PATH.to_string()),
            api_key_env,
            api_key,
        }
    }
}
