use crate::client::GatewayClient;
use crate::model::ModelProvider;
use std::sync::Arc;

pub(crate) struct ServerState<P: ModelProvider> {
    client: Arc<GatewayClient<P>>,
}

impl<P: ModelProvider> ServerState<P> {
    pub(crate) fn new(client: Arc<GatewayClient<P>>) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> Arc<GatewayClient<P>> {
        Arc::clone(&self.client)
    }
}
