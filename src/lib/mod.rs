pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{client, errors, orchestrator, session, stdio, tooling};
pub use cli::{Cli, RunMode};
pub use config::AppConfig;
pub use domain::types;
pub use infrastructure::{model, rpc, server};

use application::client::{ClientConfig, GatewayClient};
use application::tooling::{HttpToolClient, ToolServerInterface};
use infrastructure::model::AnthropicClient;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing(cli.mode == RunMode::Stdio);
    info!("Starting mcp-chat-gateway");
    debug!(
        mode = ?cli.mode,
        config = ?cli.config,
        port = ?cli.port,
        model = ?cli.model,
        "CLI arguments parsed"
    );

    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_cli_overrides(&cli, &mut config);
    config.require_api_key()?;
    info!(
        model = config.model.as_str(),
        servers = ?config.server_endpoints(),
        "Configuration loaded"
    );

    let provider = AnthropicClient::from_config(&config.provider, config.request_timeout())?;
    let bridge: Arc<dyn ToolServerInterface> =
        Arc::new(HttpToolClient::new(config.request_timeout())?);
    let client = Arc::new(GatewayClient::new(
        provider,
        bridge,
        ClientConfig::from_app_config(&config),
    ));

    match cli.mode {
        RunMode::Stdio => {
            info!("Launching terminal chat");
            stdio::run(client).await?;
        }
        RunMode::Rest => {
            let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
            info!(%addr, "Starting REST server");
            server::serve(client, addr).await?;
        }
    }
    info!("Gateway finished");
    Ok(())
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

fn apply_cli_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(model) = cli.model.as_ref() {
        info!(model = model.as_str(), "Overriding model based on CLI flag");
        config.model = model.clone();
    }
    if let Some(system) = cli.system.as_ref() {
        config.system_prompt = system.clone();
    }
}
