use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-chat-gateway",
    version,
    about = "Chat gateway bridging the Anthropic messages API with remote MCP tool servers"
)]
pub struct Cli {
    /// Configuration file (defaults to config/gateway.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, short, value_enum, default_value_t = RunMode::Rest)]
    pub mode: RunMode,
    /// REST port, overrides PORT and the config file
    #[arg(long)]
    pub port: Option<u16>,
    /// Model name, overrides MODEL_NAME and the config file
    #[arg(long)]
    pub model: Option<String>,
    /// System prompt, replaces the configured persona
    #[arg(long)]
    pub system: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// REST API server
    Rest,
    /// Interactive terminal chat
    Stdio,
}
