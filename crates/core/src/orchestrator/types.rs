//! Bulk run state and orchestrator errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::installer::{InstallerStatus, StatusHandle};
use crate::server::{InstallServer, ServerError};

/// Errors that abort a whole bulk run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The shared install server could not start; no package was processed.
    #[error("install server error: {0}")]
    Server(#[from] ServerError),
}

/// One timestamped line in a run's log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Internal per-package tracking, aligned with the run's input order.
struct RunPackage {
    name: String,
    install_id: Option<String>,
    install_link: Option<String>,
    page_link: Option<String>,
    status: StatusHandle,
}

/// Observer snapshot of one package in a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunPackageView {
    pub name: String,
    pub install_id: Option<String>,
    pub install_link: Option<String>,
    pub page_link: Option<String>,
    pub status: InstallerStatus,
}

/// Shared, observable state of one bulk install run.
///
/// The orchestrator writes to it while driving packages; the management API
/// and tests read snapshots. The log grows monotonically and `finished`
/// flips exactly once.
pub struct BulkRun {
    id: String,
    started_at: DateTime<Utc>,
    log: RwLock<Vec<LogEntry>>,
    packages: RwLock<Vec<RunPackage>>,
    finished: AtomicBool,
    // Keeps the server (and its port) alive for in-flight device installs
    // even after the driver loop has returned or been cancelled.
    server: OnceLock<Arc<InstallServer>>,
}

impl BulkRun {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            log: RwLock::new(Vec::new()),
            packages: RwLock::new(Vec::new()),
            finished: AtomicBool::new(false),
            server: OnceLock::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub async fn log(&self) -> Vec<LogEntry> {
        self.log.read().await.clone()
    }

    /// Snapshot of every package in input order.
    pub async fn packages(&self) -> Vec<RunPackageView> {
        self.packages
            .read()
            .await
            .iter()
            .map(|package| RunPackageView {
                name: package.name.clone(),
                install_id: package.install_id.clone(),
                install_link: package.install_link.clone(),
                page_link: package.page_link.clone(),
                status: package.status.get(),
            })
            .collect()
    }

    /// Status handles in input order. Exposed so observers (and device
    /// simulations in tests) can watch or drive individual installs.
    pub async fn statuses(&self) -> Vec<StatusHandle> {
        self.packages
            .read()
            .await
            .iter()
            .map(|package| package.status.clone())
            .collect()
    }

    pub fn server(&self) -> Option<&Arc<InstallServer>> {
        self.server.get()
    }

    pub(crate) fn attach_server(&self, server: Arc<InstallServer>) {
        if self.server.set(server).is_err() {
            tracing::warn!(run = %self.id, "install server already attached to run");
        }
    }

    pub(crate) async fn append_log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(run = %self.id, "{message}");
        self.log.write().await.push(LogEntry {
            at: Utc::now(),
            message,
        });
    }

    pub(crate) async fn add_package(&self, name: &str) -> StatusHandle {
        let status = StatusHandle::new();
        self.packages.write().await.push(RunPackage {
            name: name.to_string(),
            install_id: None,
            install_link: None,
            page_link: None,
            status: status.clone(),
        });
        status
    }

    pub(crate) async fn record_registration(
        &self,
        index: usize,
        install_id: &str,
        install_link: String,
        page_link: String,
    ) {
        let mut packages = self.packages.write().await;
        if let Some(package) = packages.get_mut(index) {
            package.install_id = Some(install_id.to_string());
            package.install_link = Some(install_link);
            package.page_link = Some(page_link);
        }
    }

    /// Flip `finished`. Returns false if it was already set.
    pub(crate) fn mark_finished(&self) -> bool {
        !self.finished.swap(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_is_append_only_and_ordered() {
        let run = BulkRun::new();
        run.append_log("first").await;
        run.append_log("second").await;

        let log = run.log().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].message, "first");
        assert_eq!(log[1].message, "second");
        assert!(log[0].at <= log[1].at);
    }

    #[tokio::test]
    async fn test_finished_flips_exactly_once() {
        let run = BulkRun::new();
        assert!(!run.is_finished());
        assert!(run.mark_finished());
        assert!(!run.mark_finished());
        assert!(run.is_finished());
    }

    #[tokio::test]
    async fn test_packages_aligned_with_insertion_order() {
        let run = BulkRun::new();
        run.add_package("alpha").await;
        run.add_package("beta").await;
        run.record_registration(1, "id-beta", "link".into(), "page".into())
            .await;

        let packages = run.packages().await;
        assert_eq!(packages[0].name, "alpha");
        assert!(packages[0].install_id.is_none());
        assert_eq!(packages[1].install_id.as_deref(), Some("id-beta"));
    }
}
