//! Packager for apps whose payload is already built.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::app::AppRef;

use super::{Packager, PackagerError};

/// Packager that stages an already-built payload into a work directory.
///
/// The copy gives the install server a location it owns for the lifetime of
/// the run: the library record can be moved or re-signed afterwards without
/// yanking the file out from under an in-flight device download.
pub struct PrebuiltPackager {
    work_dir: PathBuf,
}

impl PrebuiltPackager {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

#[async_trait]
impl Packager for PrebuiltPackager {
    async fn package(&self, app: &AppRef) -> Result<PathBuf, PackagerError> {
        let source = &app.bundle_path;
        match tokio::fs::metadata(source).await {
            Ok(metadata) if metadata.is_file() => {}
            _ => return Err(PackagerError::MissingPayload(source.clone())),
        }

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let staged = self.work_dir.join(format!("{}.ipa", Uuid::new_v4()));
        tokio::fs::copy(source, &staged).await?;

        debug!(app = %app.name, staged = %staged.display(), "staged payload");
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app(path: PathBuf) -> AppRef {
        AppRef {
            uuid: "u-1".to_string(),
            name: "Demo".to_string(),
            bundle_identifier: "com.example.demo".to_string(),
            bundle_version: "1.0".to_string(),
            bundle_path: path,
        }
    }

    #[tokio::test]
    async fn test_stages_copy_of_payload() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("demo.ipa");
        tokio::fs::write(&source, b"payload-bytes").await.unwrap();

        let packager = PrebuiltPackager::new(dir.path().join("staging"));
        let staged = packager.package(&sample_app(source.clone())).await.unwrap();

        assert_ne!(staged, source);
        assert_eq!(tokio::fs::read(&staged).await.unwrap(), b"payload-bytes");
    }

    #[tokio::test]
    async fn test_missing_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let packager = PrebuiltPackager::new(dir.path().join("staging"));

        let err = packager
            .package(&sample_app(dir.path().join("absent.ipa")))
            .await
            .unwrap_err();
        assert!(matches!(err, PackagerError::MissingPayload(_)));
    }
}
