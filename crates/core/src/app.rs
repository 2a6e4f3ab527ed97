//! App references handed to the orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::registry::PackageInfo;

/// Reference to one app the orchestrator should sign and install.
///
/// `bundle_path` points at the app's deployable payload (or the input the
/// configured signer/packager turn into one); the rest is metadata surfaced
/// to the device installer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppRef {
    /// Library record id, unique per app.
    pub uuid: String,
    /// Display name.
    pub name: String,
    pub bundle_identifier: String,
    pub bundle_version: String,
    pub bundle_path: PathBuf,
}

impl AppRef {
    /// Manifest metadata for this app.
    pub fn package_info(&self) -> PackageInfo {
        PackageInfo {
            bundle_identifier: self.bundle_identifier.clone(),
            bundle_version: self.bundle_version.clone(),
            title: self.name.clone(),
        }
    }
}
