//! Media Services control-plane client
//!
//! One method per remote operation. Long-running operations (create, start,
//! stop, delete) are acknowledged with an initial response and then polled
//! on the resource itself until a terminal state, sleeping the configured
//! retry interval between polls.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{check_response, ArmError};
use crate::types::{
    Asset, LiveEvent, LiveOutput, MediaService, StreamingEndpoint, StreamingLocator,
    StreamingLocatorProperties,
};

/// Single api-version for all Media Services routes.
const API_VERSION: &str = "2022-11-01";

/// Pre-defined policy mapping an asset to unencrypted delivery.
pub const CLEAR_STREAMING_POLICY: &str = "Predefined_ClearStreamingOnly";

/// Shared HTTP client for all control-plane requests (connection pooling).
pub(crate) static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(4)
        .build()
        .expect("Failed to build shared ARM HTTP client")
});

/// Client tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Sleep between polls of a long-running operation.
    pub long_running_retry: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            long_running_retry: Duration::from_secs(5),
        }
    }
}

/// Typed client for one Media Services account.
///
/// Holds the bearer token and account coordinates as plain fields; nothing
/// here is global or mutated after construction.
pub struct MediaServicesClient {
    management_endpoint: String,
    subscription_id: String,
    resource_group: String,
    account_name: String,
    token: String,
    client: Client,
    options: ClientOptions,
}

impl MediaServicesClient {
    pub fn new(
        management_endpoint: impl Into<String>,
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let management_endpoint: String = management_endpoint.into();
        Self {
            management_endpoint: management_endpoint.trim_end_matches('/').to_string(),
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
            token: token.into(),
            client: SHARED_CLIENT.clone(),
            options,
        }
    }

    /// URL of a route under the Media Services account, `api-version` included.
    fn account_url(&self, suffix: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Media/mediaservices/{}{}?api-version={}",
            self.management_endpoint,
            self.subscription_id,
            self.resource_group,
            self.account_name,
            suffix,
            API_VERSION
        )
    }

    fn build_headers(&self) -> Result<HeaderMap, ArmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ArmError> {
        let mut req = self.client.request(method, url).headers(self.build_headers()?);
        if let Some(body) = body {
            req = req.json(&body);
        }
        Ok(req.send().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ArmError> {
        let resp = self.send(Method::GET, url, None).await?;
        let resp = check_response(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    /// GET that maps 404 to `None`; the cleanup path probes with this.
    async fn get_json_opt<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ArmError> {
        let resp = self.send(Method::GET, url, None).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_response(resp).await?;
        Ok(Some(resp.json::<T>().await?))
    }

    /// Poll a resource until the state at `pointer` reaches `target`.
    ///
    /// `Failed`/`Canceled` are terminal failures. A missing state field just
    /// means the service has not reported one yet, so polling continues.
    async fn wait_for_state(
        &self,
        url: &str,
        resource: &str,
        pointer: &str,
        target: &str,
    ) -> Result<Value, ArmError> {
        loop {
            let value: Value = self.get_json(url).await?;
            let state = value
                .pointer(pointer)
                .and_then(Value::as_str)
                .unwrap_or_default();
            if state == target {
                return Ok(value);
            }
            if state == "Failed" || state == "Canceled" {
                return Err(ArmError::Operation {
                    resource: resource.to_string(),
                    state: state.to_string(),
                });
            }
            debug!(resource, state, target, "waiting for operation");
            tokio::time::sleep(self.options.long_running_retry).await;
        }
    }

    async fn wait_for_provisioning(&self, url: &str, resource: &str) -> Result<Value, ArmError> {
        self.wait_for_state(url, resource, "/properties/provisioningState", "Succeeded")
            .await
    }

    /// Issue a DELETE and poll until the resource is gone.
    async fn delete_and_wait(&self, url: &str, resource: &str) -> Result<(), ArmError> {
        let resp = self.send(Method::DELETE, url, None).await?;
        if resp.status() != StatusCode::NOT_FOUND {
            check_response(resp).await?;
        }
        loop {
            let resp = self.send(Method::GET, url, None).await?;
            if resp.status() == StatusCode::NOT_FOUND {
                debug!(resource, "deleted");
                return Ok(());
            }
            check_response(resp).await?;
            tokio::time::sleep(self.options.long_running_retry).await;
        }
    }

    // --- account ---

    pub async fn get_media_service(&self) -> Result<MediaService, ArmError> {
        self.get_json(&self.account_url("")).await
    }

    // --- live events ---

    /// Create a live event (not auto-started) and wait for provisioning.
    pub async fn create_live_event(
        &self,
        name: &str,
        event: &LiveEvent,
    ) -> Result<LiveEvent, ArmError> {
        let url = format!(
            "{}&autoStart=false",
            self.account_url(&format!("/liveEvents/{name}"))
        );
        let body = serde_json::to_value(event)?;
        let resp = self.send(Method::PUT, &url, Some(body)).await?;
        check_response(resp).await?;
        debug!(name, "live event create accepted");

        let get_url = self.account_url(&format!("/liveEvents/{name}"));
        let value = self.wait_for_provisioning(&get_url, name).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_live_event(&self, name: &str) -> Result<Option<LiveEvent>, ArmError> {
        self.get_json_opt(&self.account_url(&format!("/liveEvents/{name}")))
            .await
    }

    /// Start a live event and wait until it reports `Running`.
    pub async fn start_live_event(&self, name: &str) -> Result<(), ArmError> {
        let url = self.account_url(&format!("/liveEvents/{name}/start"));
        let resp = self.send(Method::POST, &url, None).await?;
        check_response(resp).await?;

        let get_url = self.account_url(&format!("/liveEvents/{name}"));
        self.wait_for_state(&get_url, name, "/properties/resourceState", "Running")
            .await?;
        Ok(())
    }

    /// Stop a live event (keeping its outputs) and wait until `Stopped`.
    pub async fn stop_live_event(&self, name: &str) -> Result<(), ArmError> {
        let url = self.account_url(&format!("/liveEvents/{name}/stop"));
        let body = serde_json::json!({ "removeOutputsOnStop": false });
        let resp = self.send(Method::POST, &url, Some(body)).await?;
        check_response(resp).await?;

        let get_url = self.account_url(&format!("/liveEvents/{name}"));
        self.wait_for_state(&get_url, name, "/properties/resourceState", "Stopped")
            .await?;
        Ok(())
    }

    pub async fn delete_live_event(&self, name: &str) -> Result<(), ArmError> {
        let url = self.account_url(&format!("/liveEvents/{name}"));
        self.delete_and_wait(&url, name).await
    }

    // --- assets ---

    /// Create an empty asset container.
    pub async fn create_asset(&self, name: &str) -> Result<Asset, ArmError> {
        let url = self.account_url(&format!("/assets/{name}"));
        let body = serde_json::json!({ "properties": {} });
        let resp = self.send(Method::PUT, &url, Some(body)).await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }

    // --- live outputs ---

    /// Bind an asset to a live event's stream; waits for provisioning.
    pub async fn create_live_output(
        &self,
        event_name: &str,
        name: &str,
        output: &LiveOutput,
    ) -> Result<LiveOutput, ArmError> {
        let url = self.account_url(&format!("/liveEvents/{event_name}/liveOutputs/{name}"));
        let body = serde_json::to_value(output)?;
        let resp = self.send(Method::PUT, &url, Some(body)).await?;
        check_response(resp).await?;
        debug!(name, event = event_name, "live output create accepted");

        let value = self.wait_for_provisioning(&url, name).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_live_output(
        &self,
        event_name: &str,
        name: &str,
    ) -> Result<Option<LiveOutput>, ArmError> {
        let url = self.account_url(&format!("/liveEvents/{event_name}/liveOutputs/{name}"));
        self.get_json_opt(&url).await
    }

    pub async fn delete_live_output(&self, event_name: &str, name: &str) -> Result<(), ArmError> {
        let url = self.account_url(&format!("/liveEvents/{event_name}/liveOutputs/{name}"));
        self.delete_and_wait(&url, name).await
    }

    // --- streaming locators ---

    /// Create a locator with the pre-defined clear (unencrypted) policy.
    pub async fn create_streaming_locator(
        &self,
        name: &str,
        asset_name: &str,
    ) -> Result<StreamingLocator, ArmError> {
        let url = self.account_url(&format!("/streamingLocators/{name}"));
        let locator = StreamingLocator {
            name: None,
            properties: StreamingLocatorProperties {
                asset_name: asset_name.to_string(),
                streaming_policy_name: CLEAR_STREAMING_POLICY.to_string(),
                streaming_locator_id: None,
            },
        };
        let body = serde_json::to_value(&locator)?;
        let resp = self.send(Method::PUT, &url, Some(body)).await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }

    // --- streaming endpoints ---

    pub async fn get_streaming_endpoint(
        &self,
        name: &str,
    ) -> Result<StreamingEndpoint, ArmError> {
        self.get_json(&self.account_url(&format!("/streamingEndpoints/{name}")))
            .await
    }

    /// Issue a start for the endpoint without waiting for it to finish.
    /// The endpoint may still be warming up when this returns.
    pub async fn start_streaming_endpoint(&self, name: &str) -> Result<(), ArmError> {
        let url = self.account_url(&format!("/streamingEndpoints/{name}/start"));
        let resp = self.send(Method::POST, &url, None).await?;
        check_response(resp).await?;
        Ok(())
    }
}
