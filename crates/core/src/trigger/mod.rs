//! Install trigger seam.
//!
//! The OS-level "open URI" action that makes the device's installer UI
//! appear. Once fired there is no way to cancel the device-side install
//! from here, so the orchestrator only ever decides whether to fire it.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

/// Errors from firing an install trigger.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("trigger command failed: {0}")]
    CommandFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The OS-level open-URI action.
#[async_trait]
pub trait InstallTrigger: Send + Sync {
    async fn open(&self, uri: &str) -> Result<(), TriggerError>;
}

/// Trigger that only logs the link.
///
/// The default on headless hosts: the device-side user opens the install
/// page from a browser instead of the host pushing a URI at the OS.
#[derive(Debug, Default)]
pub struct LogTrigger;

impl LogTrigger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InstallTrigger for LogTrigger {
    async fn open(&self, uri: &str) -> Result<(), TriggerError> {
        info!(%uri, "install link ready");
        Ok(())
    }
}

/// Trigger that hands the URI to an external opener, e.g. `xdg-open`.
pub struct CommandTrigger {
    command: String,
}

impl CommandTrigger {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl InstallTrigger for CommandTrigger {
    async fn open(&self, uri: &str) -> Result<(), TriggerError> {
        let status = Command::new(&self.command)
            .arg(uri)
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            return Err(TriggerError::CommandFailed(format!(
                "{} exited with code {:?}",
                self.command,
                status.code()
            )));
        }
        Ok(())
    }
}
