//! Conversation data model shared by the orchestrator, the model client and
//! the tool catalogue.

pub mod types;
