mod sitemap;

pub use sitemap::{SiteMap, SiteMapError};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rqdash_core::{ActionReply, EndpointKey, FormPayload, RemoteError, SelectionSnapshot};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::{JobRow, ListResponse, MemoryUsage, QueueRow, WorkerDetail, WorkerRow};

/// Shared client for every monitor call. The timeout is the only bound on an
/// in-flight action.
pub fn default_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(rqdash_config::HTTP_TIMEOUT_SECS))
        .user_agent(concat!("rqdash/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

/// HTTP client for the RQ monitor server.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    client: Client,
    site: SiteMap,
    auth: Option<BasicAuth>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    traceback: Option<String>,
}

/// Builds the remote error for a non-success response. A body that is not the
/// server's `{message, traceback}` shape is used verbatim as the message.
pub fn http_error(status: StatusCode, body: &str) -> RemoteError {
    let reason = status.canonical_reason().unwrap_or_default().to_string();
    let (message, traceback) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => (parsed.message, parsed.traceback),
        Err(_) if body.trim().is_empty() => (reason.clone(), None),
        Err(_) => (body.trim().to_string(), None),
    };
    RemoteError::Http {
        status: status.as_u16(),
        reason,
        message,
        traceback,
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(e.to_string())
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, RemoteError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(http_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
}

impl MonitorClient {
    pub fn new(client: Client, site: SiteMap) -> Self {
        Self {
            client,
            site,
            auth: None,
        }
    }

    pub fn with_basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn site(&self) -> &SiteMap {
        &self.site
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(a) => req.basic_auth(&a.username, a.password.as_deref()),
            None => req,
        }
    }

    fn endpoint_url(&self, endpoint: EndpointKey) -> Result<reqwest::Url, RemoteError> {
        self.site
            .url(endpoint)
            .map_err(|e| RemoteError::Transport(e.to_string()))
    }

    /// Sends one mutating command as a form-encoded POST.
    pub async fn post_form(
        &self,
        endpoint: EndpointKey,
        payload: &FormPayload,
    ) -> Result<ActionReply, RemoteError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, fields = payload.pairs().len(), "POST");
        let resp = self
            .authorize(self.client.post(url))
            .form(payload.pairs())
            .send()
            .await
            .map_err(transport)?;
        decode(resp).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: EndpointKey,
        query: &FormPayload,
    ) -> Result<T, RemoteError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "GET");
        let resp = self
            .authorize(self.client.get(url))
            .query(query.pairs())
            .send()
            .await
            .map_err(transport)?;
        decode(resp).await
    }

    pub async fn list_queues(&self, instance: usize) -> Result<Vec<QueueRow>, RemoteError> {
        let query = FormPayload::new().with_instance_index(instance);
        let resp: ListResponse<QueueRow> = self.get_json(EndpointKey::ListQueues, &query).await?;
        Ok(resp.data)
    }

    /// Queue names for the sidebar, in server order.
    pub async fn queue_names(&self, instance: usize) -> Result<Vec<String>, RemoteError> {
        Ok(self
            .list_queues(instance)
            .await?
            .into_iter()
            .map(|q| q.queue_name)
            .collect())
    }

    pub async fn list_workers(&self, instance: usize) -> Result<Vec<WorkerRow>, RemoteError> {
        let query = FormPayload::new().with_instance_index(instance);
        let resp: ListResponse<WorkerRow> =
            self.get_json(EndpointKey::ListWorkers, &query).await?;
        Ok(resp.data)
    }

    pub async fn list_jobs(
        &self,
        instance: usize,
        selection: &SelectionSnapshot,
    ) -> Result<Vec<JobRow>, RemoteError> {
        let mut query = FormPayload::new();
        query.push_list("queues", &selection.queues);
        query.push_list("jobstatus", &selection.job_statuses);
        let query = query.with_instance_index(instance);
        let resp: ListResponse<JobRow> = self.get_json(EndpointKey::ListJobs, &query).await?;
        Ok(resp.data)
    }

    pub async fn worker_info(
        &self,
        instance: usize,
        worker_id: &str,
    ) -> Result<WorkerDetail, RemoteError> {
        let mut query = FormPayload::new();
        query.push("worker_id", worker_id);
        let query = query.with_instance_index(instance);
        self.get_json(EndpointKey::WorkerInfo, &query).await
    }

    pub async fn redis_memory(&self, instance: usize) -> Result<MemoryUsage, RemoteError> {
        let query = FormPayload::new().with_instance_index(instance);
        self.get_json(EndpointKey::RedisMemory, &query).await
    }
}
