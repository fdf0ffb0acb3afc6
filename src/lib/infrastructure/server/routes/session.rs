use super::super::dto::{ErrorResponse, InitRequest, InitResponse};
use super::super::error::{HandlerError, gateway_failure};
use super::super::state::ServerState;
use crate::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;
use tracing::{debug, info};

#[utoipa::path(
    post,
    path = "/api/init",
    tag = "session",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Session created, or it already existed", body = InitResponse),
        (status = 400, description = "sessionId missing", body = ErrorResponse),
        (status = 500, description = "No tool server could be reached", body = ErrorResponse)
    )
)]
pub async fn init_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    payload: Result<Json<InitRequest>, JsonRejection>,
) -> Result<Json<InitResponse>, HandlerError> {
    let request = payload.map(|Json(request)| request).unwrap_or_else(|rejection| {
        debug!(%rejection, "Unreadable /api/init body");
        InitRequest::default()
    });
    let session_id = request.session_id.unwrap_or_default();
    info!(session_id = session_id.as_str(), "Received /api/init request");

    let outcome = state
        .client()
        .init_session(&session_id)
        .await
        .map_err(gateway_failure)?;

    let response = if outcome.created {
        InitResponse {
            message: "Session initialized successfully".to_string(),
            tools: Some(outcome.tools),
        }
    } else {
        InitResponse {
            message: "Session already exists".to_string(),
            tools: None,
        }
    };
    Ok(Json(response))
}
