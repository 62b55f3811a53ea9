//! Application configuration
//!
//! Loaded from an optional YAML file overridden by `AZLIVE_*` environment
//! variables (double underscore separates sections from keys, e.g.
//! `AZLIVE_AZURE__CLIENT_ID`, `AZLIVE_AZURE__SUBSCRIPTION_ID`,
//! `AZLIVE_LOGGING__LEVEL`).

use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use azlive_arm::{ClientOptions, ServicePrincipal};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub azure: AzureConfig,
    pub client: ClientConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Service-principal credentials and account coordinates.
///
/// All six fields are required for a real run. Empty values are not
/// rejected up front; the run fails at authentication or account lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_domain: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
}

impl AzureConfig {
    pub fn service_principal(&self) -> ServicePrincipal {
        ServicePrincipal {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            tenant_domain: self.tenant_domain.clone(),
        }
    }

    /// Names of required fields that are still empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("azure.client_id");
        }
        if self.client_secret.is_empty() {
            missing.push("azure.client_secret");
        }
        if self.tenant_domain.is_empty() {
            missing.push("azure.tenant_domain");
        }
        if self.subscription_id.is_empty() {
            missing.push("azure.subscription_id");
        }
        if self.resource_group.is_empty() {
            missing.push("azure.resource_group");
        }
        if self.account_name.is_empty() {
            missing.push("azure.account_name");
        }
        missing
    }
}

/// Control-plane endpoints and client tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub management_endpoint: String,
    pub authority_host: String,
    pub long_running_retry_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            management_endpoint: "https://management.azure.com".to_string(),
            authority_host: "https://login.microsoftonline.com".to_string(),
            long_running_retry_seconds: 5,
        }
    }
}

impl ClientConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            long_running_retry: Duration::from_secs(self.long_running_retry_seconds),
        }
    }
}

/// Knobs of one live session run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pre-existing delivery endpoint; not created or deleted by a run.
    pub streaming_endpoint_name: String,
    pub manifest_name: String,
    /// ISO-8601 recording retention window on the live output.
    pub archive_window_length: String,
    pub description: String,
    /// When set, the ingest URL is stable across runs; when unset the
    /// service generates a random token per live event.
    pub ingest_access_token: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            streaming_endpoint_name: "default".to_string(),
            manifest_name: "output".to_string(),
            archive_window_length: "PT1H".to_string(),
            description: "AzLive session".to_string(),
            ingest_access_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" for development, "json" for production.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    fn load(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::with_name(path));
        }

        // Override with environment variables (AZLIVE_AZURE__CLIENT_ID, etc.)
        builder = builder.add_source(
            Environment::with_prefix("AZLIVE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }
}

/// Load configuration from config file or environment variables.
///
/// Config file search order:
/// 1. `AZLIVE_CONFIG_PATH` environment variable (explicit path)
/// 2. `./config.yaml` (current working directory)
/// 3. Fall back to environment variables only
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = std::env::var("AZLIVE_CONFIG_PATH")
        .ok()
        .filter(|p| std::path::Path::new(p).exists())
        .or_else(|| {
            let cwd = "config.yaml";
            if std::path::Path::new(cwd).exists() {
                Some(cwd.to_string())
            } else {
                None
            }
        });

    match config_path {
        Some(path) => Config::from_file(&path),
        None => Config::from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.client.management_endpoint, "https://management.azure.com");
        assert_eq!(config.client.long_running_retry_seconds, 5);
        assert_eq!(config.session.streaming_endpoint_name, "default");
        assert_eq!(config.session.manifest_name, "output");
        assert_eq!(config.session.archive_window_length, "PT1H");
        assert!(config.session.ingest_access_token.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_required_lists_empty_fields() {
        let mut azure = AzureConfig::default();
        assert_eq!(azure.missing_required().len(), 6);

        azure.client_id = "app-id".to_string();
        azure.subscription_id = "sub".to_string();
        let missing = azure.missing_required();
        assert_eq!(missing.len(), 4);
        assert!(!missing.contains(&"azure.client_id"));
        assert!(missing.contains(&"azure.account_name"));
    }

    #[test]
    fn test_client_options_use_retry_seconds() {
        let client = ClientConfig {
            long_running_retry_seconds: 2,
            ..ClientConfig::default()
        };
        assert_eq!(
            client.client_options().long_running_retry,
            Duration::from_secs(2)
        );
    }
}
