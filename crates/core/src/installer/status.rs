//! Install status values and the shared status cell.
//!
//! One `InstallerStatus` exists per registered package. The install server
//! advances it on HTTP events (manifest fetch, payload transfer), the bulk
//! orchestrator advances it on local lifecycle events (ready, broken). The
//! orchestrator's completion loop and the management API only read it.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Outcome of a finished payload transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Success,
    Failure,
}

/// State of one package's install, from registration to terminal.
///
/// Forward path: `Idle` → `Ready` → `SendingManifest` → `SendingPayload` →
/// `Completed`. `Broken` is reachable from `Idle` or `Ready` when a local
/// failure (signing, packaging, trigger) happens before any HTTP exchange.
/// `Completed` and `Broken` are terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallerStatus {
    /// Package created, nothing has happened yet.
    Idle,

    /// Package registered with the install server, trigger about to fire.
    Ready,

    /// The device has requested the install manifest.
    SendingManifest,

    /// The device is downloading the payload.
    SendingPayload,

    /// Payload transfer finished (terminal).
    Completed { outcome: InstallOutcome },

    /// Local failure before any HTTP exchange (terminal).
    Broken { reason: String },
}

impl InstallerStatus {
    /// Whether no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstallerStatus::Completed { .. } | InstallerStatus::Broken { .. }
        )
    }

    /// Short label for logs and API responses.
    pub fn label(&self) -> &'static str {
        match self {
            InstallerStatus::Idle => "idle",
            InstallerStatus::Ready => "ready",
            InstallerStatus::SendingManifest => "sending_manifest",
            InstallerStatus::SendingPayload => "sending_payload",
            InstallerStatus::Completed {
                outcome: InstallOutcome::Success,
            } => "completed",
            InstallerStatus::Completed {
                outcome: InstallOutcome::Failure,
            } => "failed",
            InstallerStatus::Broken { .. } => "broken",
        }
    }
}

/// Clonable handle to one package's status cell.
///
/// Writes are atomic with respect to the whole value: a reader sees either
/// the old or the new status, never a half-updated one. The mutex is held
/// only for the copy, so the handle is safe to use from both async handlers
/// and synchronous stream adapters.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<Mutex<InstallerStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(InstallerStatus::Idle)),
        }
    }

    /// Snapshot of the current status.
    pub fn get(&self) -> InstallerStatus {
        self.inner.lock().expect("status lock poisoned").clone()
    }

    pub fn is_terminal(&self) -> bool {
        self.get().is_terminal()
    }

    /// Apply a transition, enforcing the state machine rules.
    ///
    /// Terminal states absorb every later attempt. A manifest re-fetch after
    /// the payload has started streaming is not a modeled transition; the
    /// status stays put and the anomaly is logged.
    pub fn advance(&self, next: InstallerStatus) {
        let mut current = self.inner.lock().expect("status lock poisoned");

        if current.is_terminal() {
            tracing::debug!(
                current = current.label(),
                attempted = next.label(),
                "ignoring status transition from terminal state"
            );
            return;
        }

        if matches!(*current, InstallerStatus::SendingPayload)
            && matches!(next, InstallerStatus::SendingManifest)
        {
            tracing::warn!("manifest re-requested while payload transfer is in progress");
            return;
        }

        *current = next;
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}
