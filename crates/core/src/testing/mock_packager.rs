//! Mock packager for testing.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::AppRef;
use crate::packager::{Packager, PackagerError};

/// Mock implementation of the [`Packager`] trait.
///
/// Uses the app's own `bundle_path` as the deployable payload, failing when
/// the file is absent or when scripted to fail for a uuid.
#[derive(Debug, Default)]
pub struct MockPackager {
    fail_uuids: Mutex<HashSet<String>>,
    packaged: Mutex<Vec<String>>,
}

impl MockPackager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future package call for `uuid` fail.
    pub fn fail_for(&self, uuid: &str) {
        self.fail_uuids
            .lock()
            .unwrap()
            .insert(uuid.to_string());
    }

    /// Uuids packaged so far, in call order.
    pub fn packaged(&self) -> Vec<String> {
        self.packaged.lock().unwrap().clone()
    }
}

#[async_trait]
impl Packager for MockPackager {
    async fn package(&self, app: &AppRef) -> Result<PathBuf, PackagerError> {
        if self.fail_uuids.lock().unwrap().contains(&app.uuid) {
            return Err(PackagerError::MissingPayload(app.bundle_path.clone()));
        }
        if !app.bundle_path.is_file() {
            return Err(PackagerError::MissingPayload(app.bundle_path.clone()));
        }
        self.packaged.lock().unwrap().push(app.uuid.clone());
        Ok(app.bundle_path.clone())
    }
}
