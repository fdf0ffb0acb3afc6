use super::docs::OPENAPI_PATH;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use crate::client::GatewayClient;
use crate::model::ModelProvider;
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// The full REST surface, ready to serve.
pub fn router<P>(client: Arc<GatewayClient<P>>) -> Router
where
    P: ModelProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let state = Arc::new(ServerState::new(client));
    let app = Router::new()
        .route("/api/init", post(routes::session::init_handler::<P>))
        .route("/api/chat", post(routes::chat::chat_handler::<P>))
        .route("/health", get(routes::status::health_handler))
        .route("/status", get(routes::status::status_handler::<P>));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        app.merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, super::docs::ApiDoc::openapi()))
    };
    #[cfg(not(feature = "swagger-ui"))]
    let app = app.route(OPENAPI_PATH, get(super::docs::openapi_handler));

    app.layer(cors).with_state(state)
}

pub(super) async fn serve<P>(client: Arc<GatewayClient<P>>, addr: SocketAddr) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    info!(%addr, "Binding REST server");
    let app = router(client);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "REST server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
