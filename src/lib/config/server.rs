use serde::Deserialize;

/// A remote tool server, addressed by its HTTP base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub endpoint: String,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawServer {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) endpoint: String,
}

impl From<RawServer> for ServerConfig {
    fn from(raw: RawServer) -> Self {
        let endpoint = shellexpand::env(&raw.endpoint)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| raw.endpoint.clone());

        Self {
            name: raw.name,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        }
    }
}
