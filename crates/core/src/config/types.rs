use std::net::IpAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orchestrator::OrchestratorConfig;
use crate::server::InstallServerConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Management API listener.
    #[serde(default)]
    pub api: ApiConfig,

    /// The OTA install server. Its port is never configured here; each
    /// instance picks one at random from the fixed ephemeral range.
    #[serde(default)]
    pub installer: InstallServerConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub staging: StagingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            installer: InstallServerConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            signing: SigningConfig::default(),
            trigger: TriggerConfig::default(),
            staging: StagingConfig::default(),
        }
    }
}

/// Management API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: IpAddr,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_api_port() -> u16 {
    8080
}

/// Signing backend selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignerBackend {
    /// Payloads are already signed; pass through.
    None,
    /// Shell out to an external signing command.
    Command,
}

/// Signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SigningConfig {
    #[serde(default = "default_signer_backend")]
    pub backend: SignerBackend,

    /// Signing executable (required when backend = "command").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            backend: default_signer_backend(),
            command: None,
        }
    }
}

fn default_signer_backend() -> SignerBackend {
    SignerBackend::None
}

/// Trigger backend selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerBackend {
    /// Log the install link; the device-side user opens it.
    Log,
    /// Hand the link to an external opener command.
    Command,
}

/// Install trigger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerConfig {
    #[serde(default = "default_trigger_backend")]
    pub backend: TriggerBackend,

    /// Opener executable (required when backend = "command").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            backend: default_trigger_backend(),
            command: None,
        }
    }
}

fn default_trigger_backend() -> TriggerBackend {
    TriggerBackend::Log
}

/// Payload staging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StagingConfig {
    /// Directory where deployable payloads are staged for serving.
    #[serde(default = "default_staging_dir")]
    pub dir: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
        }
    }
}

fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("airlift")
}

/// Config view safe to expose over the API: backend names only, no command
/// lines or filesystem details.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: ApiConfig,
    pub advertised_host: String,
    pub orchestrator: OrchestratorConfig,
    pub signing_backend: SignerBackend,
    pub trigger_backend: TriggerBackend,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: config.api.clone(),
            advertised_host: config.installer.advertised_host.clone(),
            orchestrator: config.orchestrator.clone(),
            signing_backend: config.signing.backend,
            trigger_backend: config.trigger.backend,
        }
    }
}
