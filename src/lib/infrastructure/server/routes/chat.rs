use super::super::dto::{ChatRequest, ChatResponse, ErrorResponse};
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
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Turn completed", body = ChatResponse),
        (status = 400, description = "sessionId or message missing", body = ErrorResponse),
        (status = 404, description = "Session was never initialized", body = ErrorResponse),
        (status = 500, description = "Tool lookup or dispatch failed", body = ErrorResponse),
        (status = 502, description = "Model provider failed", body = ErrorResponse)
    )
)]
pub async fn chat_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let ChatRequest {
        session_id,
        message,
    } = payload.map(|Json(request)| request).unwrap_or_else(|rejection| {
        debug!(%rejection, "Unreadable /api/chat body");
        ChatRequest::default()
    });
    let session_id = session_id.unwrap_or_default();
    let message = message.unwrap_or_default();
    info!(session_id = session_id.as_str(), "Received /api/chat request");

    let outcome = state
        .client()
        .chat(&session_id, &message)
        .await
        .map_err(gateway_failure)?;

    Ok(Json(ChatResponse {
        response: outcome.response,
        tool_used: outcome.tool_used,
    }))
}
