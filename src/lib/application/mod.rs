//! # Application Module
//!
//! Core gateway logic, independent of how it is exposed.
//!
//! ## Submodules
//!
//! - [`client`] - Facade creating sessions and running turns
//! - [`orchestrator`] - The turn-completion algorithm
//! - [`session`] - Session registry with per-session locking
//! - [`stdio`] - Interactive terminal chat
//! - [`tooling`] - Remote tool servers: protocol client and catalog

pub mod client;
pub mod errors;
pub mod orchestrator;
pub mod session;
pub mod stdio;
pub mod tooling;
