//! Azure Media Services ARM wire types
//!
//! Request and response bodies follow the ARM JSON convention: top-level
//! `name`/`location` plus a camelCase `properties` bag. State fields and
//! endpoint lists are optional — the service omits them until a resource
//! has been provisioned, so partial responses must never fail to parse.

use serde::{Deserialize, Serialize};

/// Media Services account metadata
#[derive(Debug, Deserialize)]
pub struct MediaService {
    pub name: Option<String>,
    pub location: String,
}

/// A named IPv4 range in an access-control allow list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRange {
    pub name: String,
    pub address: String,
    pub subnet_prefix_length: u8,
}

impl IpRange {
    /// The `0.0.0.0/0` range: permits any source address.
    pub fn allow_all() -> Self {
        Self {
            name: "AllowAll".to_string(),
            address: "0.0.0.0".to_string(),
            subnet_prefix_length: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAccessControl {
    pub allow: Vec<IpRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    pub ip: IpAccessControl,
}

/// Ingest or preview endpoint returned once a live event is provisioned
#[derive(Debug, Clone, Deserialize)]
pub struct LiveEventEndpoint {
    pub protocol: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventInput {
    pub streaming_protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,
    /// Fixed token makes the ingest URL stable across runs; when omitted
    /// the service generates a random one per creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing)]
    pub endpoints: Vec<LiveEventEndpoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventPreview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,
    #[serde(default, skip_serializing)]
    pub endpoints: Vec<LiveEventEndpoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventEncoding {
    pub encoding_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEventProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_static_hostname: Option<bool>,
    pub input: LiveEventInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<LiveEventPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<LiveEventEncoding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stream_options: Vec<String>,
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing)]
    pub resource_state: Option<String>,
}

/// Remote ingest session accepting a live video stream
#[derive(Debug, Serialize, Deserialize)]
pub struct LiveEvent {
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub properties: LiveEventProperties,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    #[serde(default, skip_serializing)]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub container: Option<String>,
}

/// Named storage container for recorded media
#[derive(Debug, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
    pub properties: AssetProperties,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hls {
    pub fragments_per_ts_segment: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveOutputProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub asset_name: String,
    pub manifest_name: String,
    /// ISO-8601 duration, e.g. `PT1H`
    pub archive_window_length: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls: Option<Hls>,
    #[serde(default, skip_serializing)]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing)]
    pub resource_state: Option<String>,
}

/// Binding that records a live event's stream into an asset
#[derive(Debug, Serialize, Deserialize)]
pub struct LiveOutput {
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
    pub properties: LiveOutputProperties,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingLocatorProperties {
    pub asset_name: String,
    pub streaming_policy_name: String,
    #[serde(default, skip_serializing)]
    pub streaming_locator_id: Option<String>,
}

/// Mapping from an asset to a delivery policy, addressable in manifest URLs
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamingLocator {
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
    pub properties: StreamingLocatorProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingEndpointProperties {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub resource_state: Option<String>,
}

/// Named delivery node; must be running before manifests are servable
#[derive(Debug, Deserialize)]
pub struct StreamingEndpoint {
    pub name: Option<String>,
    #[serde(default)]
    pub properties: StreamingEndpointProperties,
}

/// ARM error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
