mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use docs::{ApiDoc, OPENAPI_PATH};
pub use error::ServerError;
pub use router::router;

use crate::client::GatewayClient;
use crate::model::ModelProvider;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve<P>(client: Arc<GatewayClient<P>>, addr: SocketAddr) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    router::serve(client, addr).await
}
