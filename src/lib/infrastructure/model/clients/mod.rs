//! Model clients

mod anthropic;
mod base;

pub use anthropic::{ANTHROPIC_VERSION, AnthropicClient};
pub use base::HttpClientBase;
