use super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, InitRequest, InitResponse, ServerInfo,
    StatusResponse,
};
use super::routes;
use axum::Json;
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::session::init_handler,
        routes::chat::chat_handler,
        routes::status::health_handler,
        routes::status::status_handler
    ),
    components(
        schemas(
            InitRequest,
            InitResponse,
            ChatRequest,
            ChatResponse,
            ErrorResponse,
            StatusResponse,
            ServerInfo
        )
    ),
    tags(
        (name = "session", description = "Session initialization against the tool servers"),
        (name = "chat", description = "Conversation turns"),
        (name = "status", description = "Liveness and gateway status")
    )
)]
pub struct ApiDoc;

#[cfg_attr(feature = "swagger-ui", allow(dead_code))]
pub(super) async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
