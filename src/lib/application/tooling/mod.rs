mod catalog;
mod error;
mod http;
mod interface;

pub use catalog::ToolCatalog;
pub use error::ProtocolError;
pub use http::HttpToolClient;
pub use interface::{ToolResultPayload, ToolServerInterface};
