//! ARM client error types
//!
//! Common error enum and response utilities used by every control-plane call.

use thiserror::Error;

use crate::types::ErrorResponse;

/// Common error type for all Media Services control-plane calls.
#[derive(Debug, Error)]
pub enum ArmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("ARM error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Operation on {resource} ended in state {state}")]
    Operation { resource: String, state: String },
}

/// Check a response status before processing the body.
///
/// Client/server errors are mapped to `Api` when the body carries an ARM
/// error envelope, otherwise to `Http` with the request URL.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ArmError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        let url = resp.url().to_string();
        if let Ok(body) = resp.json::<ErrorResponse>().await {
            return Err(ArmError::Api {
                code: body.error.code,
                message: body.error.message,
            });
        }
        return Err(ArmError::Http { status, url });
    }
    Ok(resp)
}

impl From<reqwest::Error> for ArmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ArmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ArmError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}
