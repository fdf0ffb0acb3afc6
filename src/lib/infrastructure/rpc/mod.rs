//! Wire types for the JSON-RPC tool protocol.

pub mod types;
