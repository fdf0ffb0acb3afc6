//! Model infrastructure module
//!
//! The LLM is consumed through the [`ModelProvider`] trait so the
//! orchestrator never depends on a concrete API.
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider trait
//! - `adapter` - Provider payload to content block conversion
//! - `clients` - HTTP client implementations

pub mod adapter;
pub mod clients;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use clients::AnthropicClient;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse};
