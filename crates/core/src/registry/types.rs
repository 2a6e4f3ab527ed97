//! Package registry types.
//!
//! Maps an opaque install id to the package the server should hand to the
//! device. Entries are inserted by the orchestrator and looked up by server
//! workers handling device requests; they are never overwritten or removed,
//! the registry is simply discarded with its owning server instance.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::installer::StatusHandle;

/// App metadata embedded in the install manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageInfo {
    /// Bundle identifier, e.g. `com.example.app`.
    pub bundle_identifier: String,
    /// Bundle version string.
    pub bundle_version: String,
    /// Human-readable title shown by the device installer.
    pub title: String,
}

/// One installable package known to the server.
#[derive(Debug, Clone)]
pub struct RegisteredPackage {
    pub info: PackageInfo,
    /// Location of the deployable payload on disk.
    pub package_path: PathBuf,
    /// Status cell shared with the orchestrator and observers.
    pub status: StatusHandle,
}

/// Concurrent id → package map for one server instance.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    inner: RwLock<HashMap<String, Arc<RegisteredPackage>>>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package under a freshly generated id.
    ///
    /// Ids are never reused; a duplicate insert is a caller bug and is
    /// ignored rather than clobbering the existing entry.
    pub async fn register(&self, id: impl Into<String>, package: RegisteredPackage) {
        let id = id.into();
        let mut map = self.inner.write().await;
        if map.contains_key(&id) {
            tracing::warn!(%id, "package id already registered, ignoring");
            return;
        }
        map.insert(id, Arc::new(package));
    }

    pub async fn get(&self, id: &str) -> Option<Arc<RegisteredPackage>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Snapshot of all registered ids.
    pub async fn ids(&self) -> Vec<String> {
        self.inner.read().await.keys().cloned().collect()
    }
}
