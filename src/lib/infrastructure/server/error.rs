use super::dto::ErrorResponse;
use crate::client::GatewayError;
use axum::Json;
use axum::http::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub(super) type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Maps a gateway failure onto the JSON error body the REST clients expect.
pub(super) fn gateway_failure(err: GatewayError) -> HandlerError {
    let status = err.status_code();
    if status.is_server_error() {
        error!(%err, status = status.as_u16(), "Request failed");
    } else {
        warn!(%err, status = status.as_u16(), "Request rejected");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
}
