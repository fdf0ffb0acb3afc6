use super::super::dto::{ServerInfo, StatusResponse};
use super::super::state::ServerState;
use crate::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/health",
    tag = "status",
    responses((status = 200, description = "Process is up", body = String))
)]
pub async fn health_handler() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses((status = 200, description = "Gateway status", body = StatusResponse))
)]
pub async fn status_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
) -> Json<StatusResponse> {
    let client = state.client();
    let info = client.client_info();
    Json(StatusResponse {
        status: "online".to_string(),
        sessions: client.session_count(),
        server: ServerInfo {
            name: info.name.clone(),
            version: info.version.clone(),
            connected_to: client.server_endpoints(),
        },
    })
}
