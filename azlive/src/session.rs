//! Live session orchestration
//!
//! One run provisions a complete live-streaming session — live event,
//! recording asset, live output, streaming locator — resolves the playback
//! URLs, and then tears down everything it created. Cleanup runs on every
//! exit path once authentication has succeeded.

use nanoid::nanoid;
use thiserror::Error;
use tracing::{info, warn};

use azlive_arm::types::{
    AccessControl, Hls, IpAccessControl, IpRange, LiveEvent, LiveEventEncoding, LiveEventInput,
    LiveEventPreview, LiveEventProperties, LiveOutput, LiveOutputProperties,
};
use azlive_arm::{login_with_service_principal, ArmError, MediaServicesClient};

use crate::config::{Config, SessionConfig};
use crate::manifest::manifest_paths;

/// Alphanumeric-only token; Azure resource names reject nanoid's default
/// `-`/`_` characters in some positions.
const TOKEN_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

#[derive(Debug, Error)]
pub enum SessionError {
    /// Nothing was created; cleanup is neither needed nor attempted.
    #[error("Authentication failed: {0}")]
    Auth(ArmError),

    #[error("Provisioning failed: {0}")]
    Provision(ArmError),

    /// Provisioning succeeded but teardown left resources behind.
    #[error("Cleanup failed: {0}")]
    Cleanup(ArmError),
}

/// Resource names for one run, derived from a fresh uniqueness token so
/// concurrent or earlier incomplete runs cannot collide.
#[derive(Debug, Clone)]
pub struct SessionNames {
    pub live_event: String,
    pub asset: String,
    pub live_output: String,
    pub streaming_locator: String,
}

impl SessionNames {
    pub fn generate() -> Self {
        let token = nanoid!(8, &TOKEN_ALPHABET);
        Self {
            live_event: format!("liveEvent-{token}"),
            asset: format!("archiveAsset{token}"),
            live_output: format!("liveOutput{token}"),
            streaming_locator: format!("liveStreamLocator{token}"),
        }
    }
}

/// Everything a caller needs to ingest into and play back the session.
///
/// The endpoint fields are optional: the service populates endpoint lists
/// only once the live event is actually running.
#[derive(Debug, Clone)]
pub struct SessionHandles {
    pub ingest_url: Option<String>,
    pub preview_endpoint: Option<String>,
    pub streaming_endpoint: Option<String>,
    pub hls_manifest: String,
    pub dash_manifest: String,
}

/// Authenticate, provision a session, and always tear it down again.
///
/// Cleanup errors never propagate uncaught: a provisioning error wins (the
/// cleanup failure is logged), and a cleanup failure after a clean
/// provision is returned as [`SessionError::Cleanup`].
pub async fn run_session(config: &Config) -> Result<SessionHandles, SessionError> {
    let principal = config.azure.service_principal();
    let token = login_with_service_principal(&principal, &config.client.authority_host)
        .await
        .map_err(SessionError::Auth)?;

    let client = MediaServicesClient::new(
        &config.client.management_endpoint,
        &config.azure.subscription_id,
        &config.azure.resource_group,
        &config.azure.account_name,
        token.access_token,
        config.client.client_options(),
    );

    let orchestrator = SessionOrchestrator::new(client, config.session.clone());
    orchestrator.run().await
}

/// Drives the create → start → link → cleanup sequence.
///
/// The client and settings are plain fields, injected at construction;
/// tests swap in a client pointed at a mock control plane.
pub struct SessionOrchestrator {
    client: MediaServicesClient,
    settings: SessionConfig,
    names: SessionNames,
}

impl SessionOrchestrator {
    pub fn new(client: MediaServicesClient, settings: SessionConfig) -> Self {
        Self {
            client,
            settings,
            names: SessionNames::generate(),
        }
    }

    pub fn names(&self) -> &SessionNames {
        &self.names
    }

    pub async fn run(&self) -> Result<SessionHandles, SessionError> {
        let outcome = self.provision().await.map_err(SessionError::Provision);
        if let Err(ref err) = outcome {
            warn!(error = %err, "provisioning failed, cleaning up");
        }

        match (outcome, self.cleanup().await) {
            (Ok(handles), Ok(())) => Ok(handles),
            (Ok(_), Err(err)) => Err(SessionError::Cleanup(err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                // the original failure is the more useful one to surface
                warn!(error = %cleanup_err, "cleanup failed after provisioning error");
                Err(err)
            }
        }
    }

    async fn provision(&self) -> Result<SessionHandles, ArmError> {
        let account = self.client.get_media_service().await?;
        info!(location = %account.location, "resolved media account");

        info!(name = %self.names.live_event, "creating live event");
        let event = self.live_event_request(&account.location);
        self.client
            .create_live_event(&self.names.live_event, &event)
            .await?;

        info!(name = %self.names.asset, "creating archive asset");
        let asset = self.client.create_asset(&self.names.asset).await?;

        if let Some(asset_name) = asset.name.as_deref() {
            info!(name = %self.names.live_output, "creating live output");
            let output = self.live_output_request(asset_name);
            self.client
                .create_live_output(&self.names.live_event, &self.names.live_output, &output)
                .await?;
        }

        info!(name = %self.names.live_event, "starting live event");
        self.client.start_live_event(&self.names.live_event).await?;

        let started = self.client.get_live_event(&self.names.live_event).await?;
        let (ingest_url, preview_endpoint) = match started {
            Some(event) => {
                let ingest = event
                    .properties
                    .input
                    .endpoints
                    .first()
                    .and_then(|e| e.url.clone());
                let preview = event
                    .properties
                    .preview
                    .and_then(|p| p.endpoints.first().and_then(|e| e.url.clone()));
                (ingest, preview)
            }
            None => (None, None),
        };
        if let Some(url) = &ingest_url {
            info!(%url, "RTMP ingest");
        }
        if let Some(url) = &preview_endpoint {
            info!(%url, "preview");
        }

        let locator = self
            .client
            .create_streaming_locator(&self.names.streaming_locator, &self.names.asset)
            .await?;

        let endpoint = self
            .client
            .get_streaming_endpoint(&self.settings.streaming_endpoint_name)
            .await?;
        if endpoint.properties.resource_state.as_deref() != Some("Running") {
            // start is not awaited to completion; the endpoint may still be
            // warming up when the manifest URLs below are first used
            info!(name = %self.settings.streaming_endpoint_name, "starting streaming endpoint");
            self.client
                .start_streaming_endpoint(&self.settings.streaming_endpoint_name)
                .await?;
        }

        let hostname = endpoint.properties.host_name;
        let locator_id = locator.properties.streaming_locator_id;
        let manifests = manifest_paths(
            "https",
            hostname.as_deref().unwrap_or_default(),
            locator_id.as_deref().unwrap_or_default(),
            &self.settings.manifest_name,
        );

        Ok(SessionHandles {
            ingest_url,
            preview_endpoint,
            streaming_endpoint: hostname,
            hls_manifest: manifests.hls,
            dash_manifest: manifests.dash,
        })
    }

    /// Delete what this run created, output before event (the output
    /// depends on the event). The event is stopped first only when it is
    /// actually running.
    async fn cleanup(&self) -> Result<(), ArmError> {
        if self
            .client
            .get_live_output(&self.names.live_event, &self.names.live_output)
            .await?
            .is_some()
        {
            info!(name = %self.names.live_output, "deleting live output");
            self.client
                .delete_live_output(&self.names.live_event, &self.names.live_output)
                .await?;
        }

        if let Some(event) = self.client.get_live_event(&self.names.live_event).await? {
            if event.properties.resource_state.as_deref() == Some("Running") {
                info!(name = %self.names.live_event, "stopping live event");
                self.client.stop_live_event(&self.names.live_event).await?;
            }
            info!(name = %self.names.live_event, "deleting live event");
            self.client.delete_live_event(&self.names.live_event).await?;
        }

        // TODO: delete the streaming locator too; it currently outlives the run
        Ok(())
    }

    fn live_event_request(&self, location: &str) -> LiveEvent {
        let allow_all = AccessControl {
            ip: IpAccessControl {
                allow: vec![IpRange::allow_all()],
            },
        };
        LiveEvent {
            name: None,
            location: Some(location.to_string()),
            properties: LiveEventProperties {
                description: Some(self.settings.description.clone()),
                use_static_hostname: Some(true),
                input: LiveEventInput {
                    streaming_protocol: "RTMP".to_string(),
                    access_control: Some(allow_all.clone()),
                    access_token: self.settings.ingest_access_token.clone(),
                    endpoints: vec![],
                },
                preview: Some(LiveEventPreview {
                    access_control: Some(allow_all),
                    endpoints: vec![],
                }),
                // pass-through: no transcoding
                encoding: Some(LiveEventEncoding {
                    encoding_type: "None".to_string(),
                }),
                stream_options: vec!["LowLatency".to_string()],
                provisioning_state: None,
                resource_state: None,
            },
        }
    }

    fn live_output_request(&self, asset_name: &str) -> LiveOutput {
        LiveOutput {
            name: None,
            properties: LiveOutputProperties {
                description: Some(self.settings.description.clone()),
                asset_name: asset_name.to_string(),
                manifest_name: self.settings.manifest_name.clone(),
                archive_window_length: self.settings.archive_window_length.clone(),
                // single fragment per segment for low-latency HLS
                hls: Some(Hls {
                    fragments_per_ts_segment: 1,
                }),
                provisioning_state: None,
                resource_state: None,
            },
        }
    }
}
