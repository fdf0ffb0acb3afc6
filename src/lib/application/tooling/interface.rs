use async_trait::async_trait;
use serde_json::Value;

use super::error::ProtocolError;
use crate::domain::types::ToolDescriptor;
use crate::rpc::types::ClientInfo;

/// Content items a tool call produced, forwarded verbatim to the model.
pub type ToolResultPayload = Vec<Value>;

/// The remote tool protocol as seen from one client: register a session,
/// initialize it, list tools, call tools. Every method makes exactly one
/// attempt; retry policy belongs to the caller.
#[async_trait]
pub trait ToolServerInterface: Send + Sync {
    /// `false` on any failure, so an unreachable server can simply be skipped.
    async fn check_availability(&self, endpoint: &str) -> bool;

    async fn register_session(&self, endpoint: &str, session_id: &str)
    -> Result<(), ProtocolError>;

    async fn initialize(
        &self,
        endpoint: &str,
        session_id: &str,
        client: &ClientInfo,
    ) -> Result<(), ProtocolError>;

    /// Tools come back tagged with `endpoint` as their owner.
    async fn list_tools(
        &self,
        endpoint: &str,
        session_id: &str,
    ) -> Result<Vec<ToolDescriptor>, ProtocolError>;

    /// Arguments are forwarded as-is; the server validates them.
    async fn call_tool(
        &self,
        endpoint: &str,
        session_id: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolResultPayload, ProtocolError>;
}
