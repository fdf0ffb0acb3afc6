use super::AppConfig;
use super::error::ConfigError;
use super::provider::RawProviderConfig;
use super::server::{RawServer, ServerConfig};
use crate::constants::{
    BAKERY_SERVER_ENDPOINT, BAKERY_SERVER_NAME, CLIENT_NAME, CLIENT_VERSION, CONFIG_PATH,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, ENV_PATH, GOOGLEMAPS_SERVER_ENDPOINT,
    GOOGLEMAPS_SERVER_NAME, MODEL_ENV, PORT_ENV,
};
use crate::rpc::types::ClientInfo;
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, warn};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub rest: RawRest,
    #[serde(default)]
    pub client: RawClient,
    #[serde(default)]
    pub provider: RawProviderConfig,
    /// `None` means "use the built-in servers"; an explicit empty list is
    /// rejected during validation.
    pub servers: Option<Vec<RawServer>>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawRest {
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawClient {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Ensures environment variables are loaded from .env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path.
///
/// An explicit path must exist. Without one, `config/gateway.toml` is read
/// if present and built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let raw = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)?
            } else {
                debug!(path = CONFIG_PATH, "No configuration file, using defaults");
                RawConfig::default()
            }
        }
    };
    validate_and_build(raw, |name| std::env::var(name).ok())
}

fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    debug!(path = %path.display(), "Reading gateway configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn builtin_servers() -> Vec<RawServer> {
    vec![
        RawServer {
            name: BAKERY_SERVER_NAME.to_string(),
            endpoint: BAKERY_SERVER_ENDPOINT.to_string(),
        },
        RawServer {
            name: GOOGLEMAPS_SERVER_NAME.to_string(),
            endpoint: GOOGLEMAPS_SERVER_ENDPOINT.to_string(),
        },
    ]
}

pub(super) fn validate_and_build<F>(parsed: RawConfig, lookup_env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let model = lookup_env(MODEL_ENV)
        .filter(|m| !m.trim().is_empty())
        .or(parsed.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let port = match lookup_env(PORT_ENV) {
        Some(raw) => match raw.trim().parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                warn!(value = raw.as_str(), "Ignoring invalid PORT value");
                parsed.rest.port.unwrap_or(DEFAULT_PORT)
            }
        },
        None => parsed.rest.port.unwrap_or(DEFAULT_PORT),
    };

    let max_tokens = parsed.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    if max_tokens == 0 {
        return Err(ConfigError::InvalidMaxTokens);
    }

    let temperature = parsed.temperature.unwrap_or(DEFAULT_TEMPERATURE);
    if !(0.0..=1.0).contains(&temperature) {
        return Err(ConfigError::InvalidTemperature { value: temperature });
    }

    let raw_servers = parsed.servers.unwrap_or_else(builtin_servers);
    if raw_servers.is_empty() {
        return Err(ConfigError::NoServersConfigured);
    }
    let servers: Vec<ServerConfig> = raw_servers.into_iter().map(ServerConfig::from).collect();
    if let Some(server) = servers.iter().find(|s| s.endpoint.is_empty()) {
        return Err(ConfigError::EmptyEndpoint {
            server: server.name.clone(),
        });
    }

    Ok(AppConfig {
        model,
        max_tokens,
        temperature,
        system_prompt: parsed
            .system_prompt
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        request_timeout_secs: parsed
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        port,
        client: ClientInfo {
            name: parsed.client.name.unwrap_or_else(|| CLIENT_NAME.to_string()),
            version: parsed
                .client
                .version
                .unwrap_or_else(|| CLIENT_VERSION.to_string()),
        },
        provider: parsed.provider.resolve(&lookup_env),
        servers,
    })
}
