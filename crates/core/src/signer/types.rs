//! Signing request types and errors.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the signing operation.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The external signing command exited non-zero.
    #[error("signing command failed: {0}")]
    CommandFailed(String),

    /// The signer finished but produced no usable output package.
    #[error("signer produced no output package")]
    MissingOutput,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a signing certificate; the signing engine resolves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateRef {
    pub name: String,
    pub path: PathBuf,
}

/// Per-app signing options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SigningOptions {
    /// Override the bundle identifier in the signed output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_override: Option<String>,

    /// Override the display name in the signed output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_override: Option<String>,

    /// Entitlements file to embed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<PathBuf>,
}

/// Everything a bulk run needs to sign its apps: one certificate plus
/// per-app options and icons keyed by app uuid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateRef>,

    /// Per-app options; apps without an entry get `default_options`.
    #[serde(default)]
    pub options: HashMap<String, SigningOptions>,

    /// Per-app replacement icons.
    #[serde(default)]
    pub icons: HashMap<String, PathBuf>,

    #[serde(default)]
    pub default_options: SigningOptions,
}

impl SigningContext {
    /// Assemble the request for one app.
    pub fn request_for(&self, uuid: &str) -> SigningRequest {
        SigningRequest {
            certificate: self.certificate.clone(),
            options: self
                .options
                .get(uuid)
                .cloned()
                .unwrap_or_else(|| self.default_options.clone()),
            icon: self.icons.get(uuid).cloned(),
        }
    }
}

/// Inputs for signing one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningRequest {
    pub certificate: Option<CertificateRef>,
    pub options: SigningOptions,
    pub icon: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_for_falls_back_to_defaults() {
        let mut context = SigningContext {
            default_options: SigningOptions {
                name_override: Some("Default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        context.options.insert(
            "app-1".to_string(),
            SigningOptions {
                name_override: Some("Custom".to_string()),
                ..Default::default()
            },
        );

        let custom = context.request_for("app-1");
        assert_eq!(custom.options.name_override.as_deref(), Some("Custom"));

        let fallback = context.request_for("app-2");
        assert_eq!(fallback.options.name_override.as_deref(), Some("Default"));
    }
}
