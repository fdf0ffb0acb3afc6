use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no tool servers configured - at least one [[servers]] entry is required")]
    NoServersConfigured,

    #[error("server '{server}' has an empty endpoint")]
    EmptyEndpoint { server: String },

    #[error("temperature {value} is outside the range 0.0..=1.0")]
    InvalidTemperature { value: f32 },

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("environment variable {var} is not set - an API key is required")]
    MissingApiKey { var: String },
}
