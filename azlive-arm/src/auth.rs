//! AAD service-principal authentication
//!
//! Client-credentials token exchange against an Azure AD authority. The
//! authority host is a parameter so tests can point it at a local mock.

use serde::Deserialize;

use crate::client::SHARED_CLIENT;
use crate::error::ArmError;

/// ARM audience requested for the access token.
pub const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";

/// Service-principal credentials, usually read from the environment.
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_domain: String,
}

/// Bearer token for the ARM management plane.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchange service-principal credentials for a management-plane token.
///
/// POSTs the OAuth2 client-credentials grant to
/// `{authority_host}/{tenant}/oauth2/token`. Any failure here is
/// `ArmError::Auth`; nothing has been created yet, so the caller can bail
/// out without cleanup.
pub async fn login_with_service_principal(
    principal: &ServicePrincipal,
    authority_host: &str,
) -> Result<AccessToken, ArmError> {
    let url = format!(
        "{}/{}/oauth2/token",
        authority_host.trim_end_matches('/'),
        principal.tenant_domain
    );

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", principal.client_id.as_str()),
        ("client_secret", principal.client_secret.as_str()),
        ("resource", MANAGEMENT_RESOURCE),
    ];

    let response = SHARED_CLIENT
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(|e| ArmError::Auth(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ArmError::Auth(format!(
            "token endpoint returned {}",
            response.status()
        )));
    }

    let token: AccessToken = response
        .json()
        .await
        .map_err(|e| ArmError::Auth(format!("malformed token response: {e}")))?;

    if token.access_token.is_empty() {
        return Err(ArmError::Auth("token response had no access_token".into()));
    }

    Ok(token)
}
