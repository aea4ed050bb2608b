//! Agent API client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use hostrun_core::{CommandId, InstanceRecord, TargetId, TargetSelector, TaskBody};
use hostrun_dispatch::{BackendError, CommandBackend, StatusReply, TargetInventory};

use crate::types::{
    InvocationDto, QueryInstancesRequest, QueryInstancesResponse, SubmitCommandRequest,
    SubmitCommandResponse,
};

/// HTTP client for the remote-execution agent.
///
/// One instance serves both backend roles: target inventory and command
/// execution. Each call is an independent request/response exchange.
pub struct AgentClient {
    inner: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    /// Create a new client for the agent at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if status.is_client_error() {
        let detail = response.text().await.unwrap_or_default();
        return Err(BackendError::Rejected(format!("HTTP {status}: {detail}")));
    }
    if !status.is_success() {
        return Err(BackendError::Unreachable(format!("HTTP {status}")));
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::Protocol(e.to_string()))
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Unreachable(err.to_string())
}

#[async_trait]
impl TargetInventory for AgentClient {
    async fn query(&self, selector: &TargetSelector) -> Result<Vec<InstanceRecord>, BackendError> {
        let request = QueryInstancesRequest::from(selector);
        let response: QueryInstancesResponse =
            self.post_json("/v1/instances/query", &request).await?;

        Ok(response.instances.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommandBackend for AgentClient {
    async fn submit(&self, target: &TargetId, body: &TaskBody) -> Result<CommandId, BackendError> {
        let request = SubmitCommandRequest {
            target_id: target.as_str(),
            commands: body.lines(),
        };
        let response: SubmitCommandResponse = self.post_json("/v1/commands", &request).await?;

        Ok(CommandId::new(response.command_id))
    }

    async fn status(
        &self,
        command: &CommandId,
        target: &TargetId,
    ) -> Result<StatusReply, BackendError> {
        let path = format!("/v1/commands/{}/invocations/{}", command, target);
        let invocation: InvocationDto = self.get_json(&path).await?;

        invocation.into_reply()
    }
}
