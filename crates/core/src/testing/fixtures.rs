//! Shared fixtures for tests.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::app::AppRef;

/// App reference with an explicit payload path.
pub fn app_ref(name: &str, bundle_path: PathBuf) -> AppRef {
    AppRef {
        uuid: Uuid::new_v4().to_string(),
        name: name.to_string(),
        bundle_identifier: format!("com.example.{name}"),
        bundle_version: "1.0".to_string(),
        bundle_path,
    }
}

/// App reference with a small real payload file written under `dir`.
pub fn app_ref_with_payload(dir: &Path, name: &str) -> AppRef {
    let path = dir.join(format!("{name}.ipa"));
    std::fs::write(&path, format!("payload-for-{name}"))
        .expect("failed to write fixture payload");
    app_ref(name, path)
}
