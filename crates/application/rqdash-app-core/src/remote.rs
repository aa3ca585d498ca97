use rqdash_core::{ActionReply, FormPayload, Method, RemoteError, RouteEntry};
use rqdash_infra::MonitorClient;

use crate::domain::BrokerContext;
use crate::ports::BrokerApi;

#[async_trait::async_trait]
impl BrokerApi for MonitorClient {
    async fn submit_action(
        &self,
        route: &'static RouteEntry,
        payload: FormPayload,
    ) -> Result<ActionReply, RemoteError> {
        match route.method {
            Method::Post => self.post_form(route.endpoint, &payload).await,
        }
    }

    async fn queue_names(&self, context: BrokerContext) -> Result<Vec<String>, RemoteError> {
        MonitorClient::queue_names(self, context.instance_index).await
    }
}
