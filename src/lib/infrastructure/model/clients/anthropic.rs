//! Anthropic messages API client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::{ChatMessage, ToolFunctionSchema};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct AnthropicClient {
    base: HttpClientBase,
    api_path: String,
}

impl AnthropicClient {
    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self, ModelError> {
        Ok(Self {
            base: HttpClientBase::new(
                config.id.clone(),
                config.endpoint.clone(),
                config.api_key.clone(),
                timeout,
            )?,
            api_path: config.api_path.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, ModelError> {
        let api_key = self.base.require_api_key()?;
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| ModelError::missing_api_key(&self.base.id))?;
        headers.insert(HeaderName::from_static("x-api-key"), key);
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }
}

#[async_trait]
impl ModelProvider for AnthropicClient {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let headers = self.headers()?;

        let payload = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            messages: &request.messages,
            tools: &request.tools,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Anthropic"
        );

        let response: AnthropicResponse = self.base.post_json(&url, headers, &payload).await?;
        debug!(
            stop_reason = response.stop_reason.as_deref(),
            blocks = response.content.len(),
            "Received response from Anthropic"
        );

        Ok(ModelResponse {
            content: MessageAdapter::from_anthropic_content(response.content),
            stop_reason: response.stop_reason,
        })
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolFunctionSchema],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    stop_reason: Option<String>,
}
