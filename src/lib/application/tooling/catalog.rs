use super::interface::ToolServerInterface;
use crate::application::errors::SessionError;
use crate::config::ServerConfig;
use crate::domain::types::{ToolDescriptor, ToolFunctionSchema};
use crate::rpc::types::ClientInfo;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Session-scoped registry of every tool the configured servers offer, in
/// server order and then listing order.
///
/// Names are not deduplicated across servers: lookups return the first
/// registered tool, later ones with the same name are shadowed.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn from_tools(tools: Vec<ToolDescriptor>) -> Self {
        Self { tools }
    }

    /// Runs status → register → initialize → list against each server.
    /// A server failing any step is logged and skipped; only an empty
    /// overall result is an error.
    pub async fn build(
        bridge: &dyn ToolServerInterface,
        servers: &[ServerConfig],
        session_id: &str,
        client: &ClientInfo,
    ) -> Result<Self, SessionError> {
        let mut tools: Vec<ToolDescriptor> = Vec::new();

        for server in servers {
            let endpoint = server.endpoint.as_str();
            if !bridge.check_availability(endpoint).await {
                warn!(server = %server.name, endpoint, "Skipping unavailable tool server");
                continue;
            }
            if let Err(err) = bridge.register_session(endpoint, session_id).await {
                warn!(server = %server.name, %err, "Failed to register session with tool server");
                continue;
            }
            if let Err(err) = bridge.initialize(endpoint, session_id, client).await {
                warn!(server = %server.name, %err, "Failed to initialize session with tool server");
                continue;
            }
            let listed = match bridge.list_tools(endpoint, session_id).await {
                Ok(listed) => listed,
                Err(err) => {
                    warn!(server = %server.name, %err, "Failed to list tools from tool server");
                    continue;
                }
            };

            info!(
                server = %server.name,
                session_id,
                tool_count = listed.len(),
                "Connected to tool server"
            );
            tools.extend(listed);
        }

        if tools.is_empty() {
            return Err(SessionError::NoToolServersAvailable {
                session_id: session_id.to_string(),
            });
        }

        let catalog = Self { tools };
        for shadowed in catalog.shadowed() {
            warn!(
                tool = %shadowed.name,
                endpoint = %shadowed.owner_endpoint,
                "Tool name already registered by an earlier server; this one is unreachable"
            );
        }
        debug!(session_id, tools = ?catalog.names(), "Tool catalog built");
        Ok(catalog)
    }

    pub fn find(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name.clone()).collect()
    }

    /// Schemas offered to the model, one per distinct name. Shadowed tools
    /// are left out since lookups can never reach them.
    pub fn function_schemas(&self) -> Vec<ToolFunctionSchema> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .filter(|tool| seen.insert(tool.name.as_str()))
            .map(ToolDescriptor::function_schema)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn shadowed(&self) -> impl Iterator<Item = &ToolDescriptor> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .filter(move |tool| !seen.insert(tool.name.as_str()))
    }
}
