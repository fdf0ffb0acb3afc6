//! JSON-RPC 2.0 envelope and the per-method payloads of the remote tool
//! protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const LIST_TOOLS: &str = "listTools";
    pub const CALL_TOOL: &str = "callTool";
}

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub fn new(id: u64, method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<R> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub result: Option<R>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl<R> RpcResponse<R> {
    /// Servers echo the id either as a number or as its string form.
    /// A missing id is tolerated; a different one is not.
    pub fn matches_id(&self, expected: u64) -> bool {
        match &self.id {
            None | Some(Value::Null) => true,
            Some(Value::Number(number)) => number.as_u64() == Some(expected),
            Some(Value::String(text)) => text == &expected.to_string(),
            Some(_) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct InitializeParams<'a> {
    pub client: &'a ClientInfo,
    pub capabilities: Map<String, Value>,
}

#[derive(Debug, Default, Serialize)]
pub struct ListToolsParams {}

#[derive(Debug, Deserialize)]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<RemoteTool>,
}

/// A tool as a remote server lists it. Servers speaking newer protocol
/// revisions send `inputSchema` instead of `parameters`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTool {
    /// Left blank when absent so one bad entry does not sink the listing.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolParams<'a> {
    pub name: &'a str,
    pub arguments: &'a Value,
}

#[derive(Debug, Deserialize)]
pub struct CallToolResult {
    /// Servers send `null` as well as omitting the field.
    #[serde(default)]
    pub content: Option<Vec<Value>>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}
