use super::error::ProtocolError;
use super::interface::{ToolResultPayload, ToolServerInterface};
use crate::domain::types::ToolDescriptor;
use crate::rpc::types::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, ListToolsParams,
    ListToolsResult, RegisterRequest, RemoteTool, RpcRequest, RpcResponse, methods,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

const STATUS_PATH: &str = "status";
const REGISTER_PATH: &str = "register";
const RPC_PATH: &str = "api/message";

/// Speaks the tool protocol over plain HTTP request/response. The only state
/// kept between calls is the request id counter.
pub struct HttpToolClient {
    http: Client,
    id_counter: AtomicU64,
}

impl HttpToolClient {
    /// Every request made through this client is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::from_client(http))
    }

    pub fn from_client(http: Client) -> Self {
        Self {
            http,
            id_counter: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    fn build_url(endpoint: &str, path: &str) -> String {
        let base = endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Reads the body, turning any non-2xx answer into an error carrying the
    /// server's own text.
    async fn success_body(endpoint: &str, response: Response) -> Result<String, ProtocolError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ProtocolError::transport(endpoint, source))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ProtocolError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }

    /// One JSON-RPC exchange. Yields `None` when the server acknowledged the
    /// call without a `result`.
    async fn exchange<P, R>(
        &self,
        endpoint: &str,
        session_id: &str,
        method: &str,
        params: P,
    ) -> Result<Option<R>, ProtocolError>
    where
        P: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        let id = self.next_id();
        let url = Self::build_url(endpoint, RPC_PATH);
        debug!(endpoint, session_id, method, id, "Sending JSON-RPC request");

        let response = self
            .http
            .post(&url)
            .query(&[("sessionId", session_id)])
            .json(&RpcRequest::new(id, method, params))
            .send()
            .await
            .map_err(|source| ProtocolError::transport(endpoint, source))?;
        let body = Self::success_body(endpoint, response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: RpcResponse<R> =
            serde_json::from_str(&body).map_err(|source| ProtocolError::InvalidJson {
                endpoint: endpoint.to_string(),
                source,
            })?;
        if !envelope.matches_id(id) {
            return Err(ProtocolError::malformed(
                endpoint,
                format!("response id {:?} does not match request id {id}", envelope.id),
            ));
        }
        if let Some(error) = envelope.error {
            return Err(ProtocolError::Rpc {
                endpoint: endpoint.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        Ok(envelope.result)
    }

    fn describe(endpoint: &str, tool: RemoteTool) -> ToolDescriptor {
        let description = tool
            .description
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format!("Tool for {}", tool.name));
        let input_schema = tool
            .parameters
            .or(tool.input_schema)
            .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
        ToolDescriptor {
            name: tool.name,
            description,
            input_schema,
            owner_endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl ToolServerInterface for HttpToolClient {
    async fn check_availability(&self, endpoint: &str) -> bool {
        let url = Self::build_url(endpoint, STATUS_PATH);
        match self.http.get(&url).send().await {
            Ok(response) => match Self::success_body(endpoint, response).await {
                Ok(_) => true,
                Err(err) => {
                    warn!(endpoint, %err, "Tool server status check failed");
                    false
                }
            },
            Err(source) => {
                warn!(endpoint, %source, "Tool server unreachable");
                false
            }
        }
    }

    async fn register_session(
        &self,
        endpoint: &str,
        session_id: &str,
    ) -> Result<(), ProtocolError> {
        let url = Self::build_url(endpoint, REGISTER_PATH);
        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest { session_id })
            .send()
            .await
            .map_err(|source| ProtocolError::transport(endpoint, source))?;
        Self::success_body(endpoint, response).await?;
        debug!(endpoint, session_id, "Session registered with tool server");
        Ok(())
    }

    async fn initialize(
        &self,
        endpoint: &str,
        session_id: &str,
        client: &ClientInfo,
    ) -> Result<(), ProtocolError> {
        let params = InitializeParams {
            client,
            capabilities: Map::new(),
        };
        let _: Option<Value> = self
            .exchange(endpoint, session_id, methods::INITIALIZE, params)
            .await?;
        Ok(())
    }

    async fn list_tools(
        &self,
        endpoint: &str,
        session_id: &str,
    ) -> Result<Vec<ToolDescriptor>, ProtocolError> {
        let result: ListToolsResult = self
            .exchange(
                endpoint,
                session_id,
                methods::LIST_TOOLS,
                ListToolsParams::default(),
            )
            .await?
            .ok_or_else(|| ProtocolError::malformed(endpoint, "listTools returned no result"))?;

        Ok(result
            .tools
            .into_iter()
            .filter(|tool| {
                let named = !tool.name.trim().is_empty();
                if !named {
                    warn!(endpoint, "Ignoring tool listed without a name");
                }
                named
            })
            .map(|tool| Self::describe(endpoint, tool))
            .collect())
    }

    async fn call_tool(
        &self,
        endpoint: &str,
        session_id: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolResultPayload, ProtocolError> {
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let params = CallToolParams {
            name: tool,
            arguments: &arguments,
        };
        let result: CallToolResult = self
            .exchange(endpoint, session_id, methods::CALL_TOOL, params)
            .await?
            .ok_or_else(|| ProtocolError::malformed(endpoint, "callTool returned no result"))?;

        if result.is_error {
            warn!(endpoint, tool, "Tool reported an error result");
        }
        Ok(result.content.unwrap_or_default())
    }
}
