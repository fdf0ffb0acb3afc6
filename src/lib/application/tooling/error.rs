use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("tool server '{endpoint}' could not be reached: {message}")]
    Transport { endpoint: String, message: String },
    #[error("tool server '{endpoint}' answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("tool server '{endpoint}' returned invalid JSON: {source}")]
    InvalidJson {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tool server '{endpoint}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        endpoint: String,
        code: i64,
        message: String,
    },
    #[error("tool server '{endpoint}' returned a malformed response: {reason}")]
    MalformedResponse { endpoint: String, reason: String },
}

impl ProtocolError {
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            format!("request timed out ({source})")
        } else {
            source.to_string()
        };
        Self::Transport {
            endpoint: endpoint.into(),
            message,
        }
    }

    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// The text the remote side produced, without the local framing.
    pub fn remote_message(&self) -> &str {
        match self {
            ProtocolError::Transport { message, .. } => message,
            ProtocolError::Status { body, .. } => body,
            ProtocolError::InvalidJson { .. } => "invalid JSON response",
            ProtocolError::Rpc { message, .. } => message,
            ProtocolError::MalformedResponse { reason, .. } => reason,
        }
    }
}
