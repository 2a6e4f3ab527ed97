//! External-command signer.
//!
//! Delegates signing to a configured executable, the same way the rest of
//! the pipeline treats signing as opaque. The command receives the app and
//! certificate through environment variables and prints the path of the
//! signed package to stdout.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use uuid::Uuid;

use crate::app::AppRef;

use super::{Signer, SignerError, SigningRequest};

/// Signer that shells out to an external signing tool.
///
/// Environment passed to the command:
/// - `AIRLIFT_APP_PATH`: the unsigned payload
/// - `AIRLIFT_CERT_PATH`, `AIRLIFT_CERT_NAME`: certificate, when supplied
/// - `AIRLIFT_ICON_PATH`: replacement icon, when supplied
/// - `AIRLIFT_BUNDLE_ID`: identifier override (or the app's own)
///
/// The command must print the signed package path as its last stdout line
/// and exit zero.
pub struct CommandSigner {
    command: String,
}

impl CommandSigner {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Signer for CommandSigner {
    async fn sign(&self, app: &AppRef, request: &SigningRequest) -> Result<AppRef, SignerError> {
        let mut command = Command::new(&self.command);
        command
            .env("AIRLIFT_APP_PATH", &app.bundle_path)
            .env(
                "AIRLIFT_BUNDLE_ID",
                request
                    .options
                    .identifier_override
                    .as_deref()
                    .unwrap_or(&app.bundle_identifier),
            )
            .kill_on_drop(true);

        if let Some(certificate) = &request.certificate {
            command
                .env("AIRLIFT_CERT_PATH", &certificate.path)
                .env("AIRLIFT_CERT_NAME", &certificate.name);
        }
        if let Some(icon) = &request.icon {
            command.env("AIRLIFT_ICON_PATH", icon);
        }

        debug!(app = %app.name, command = %self.command, "invoking signing command");
        let output = command.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SignerError::CommandFailed(format!(
                "exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let signed_path = stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .next_back()
            .map(|line| PathBuf::from(line.trim()))
            .ok_or(SignerError::MissingOutput)?;

        let mut signed = app.clone();
        signed.uuid = Uuid::new_v4().to_string();
        signed.bundle_path = signed_path;
        if let Some(name) = &request.options.name_override {
            signed.name = name.clone();
        }
        if let Some(identifier) = &request.options.identifier_override {
            signed.bundle_identifier = identifier.clone();
        }
        Ok(signed)
    }

    fn backend_name(&self) -> &'static str {
        "command"
    }
}
