// AzLive ARM client
//
// Pure HTTP client for the Azure Media Services control plane (ARM).
// Independent of the session orchestration in the `azlive` binary; it can
// be used standalone wherever a typed Media Services client is needed.
//
// Architecture:
// - auth:   AAD service-principal token exchange
// - client: one method per control-plane operation, with long-running
//           operations polled to a terminal state
// - types:  serde wire types for the ARM JSON surface
// - error:  common error enum for all client calls

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

// Re-export the main entry points for convenience
pub use auth::{login_with_service_principal, AccessToken, ServicePrincipal};
pub use client::{ClientOptions, MediaServicesClient};
pub use error::ArmError;
