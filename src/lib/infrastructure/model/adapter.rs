//! Message adapters - convert provider payloads into domain content blocks

use crate::types::ContentBlock;
use serde_json::Value;
use tracing::debug;

/// Adapter for converting provider content to domain blocks
pub struct MessageAdapter;

impl MessageAdapter {
    /// Keeps `text` and `tool_use` blocks from a messages-API response.
    /// Other block kinds (thinking, images, ...) are dropped rather than
    /// failing the whole response.
    pub fn from_anthropic_content(blocks: Vec<Value>) -> Vec<ContentBlock> {
        blocks
            .into_iter()
            .filter_map(|raw| {
                let kind = raw
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                match kind.as_str() {
                    "text" | "tool_use" => match serde_json::from_value::<ContentBlock>(raw) {
                        Ok(block) => Some(block),
                        Err(err) => {
                            debug!(kind = kind.as_str(), %err, "Dropping undecodable content block");
                            None
                        }
                    },
                    other => {
                        debug!(kind = other, "Dropping unsupported content block");
                        None
                    }
                }
            })
            .collect()
    }
}
