//! Packaging seam.
//!
//! Packaging turns an app reference into a deployable payload on disk. Like
//! signing it is opaque to the orchestrator: one async call, one path or one
//! error.

mod prebuilt;

pub use prebuilt::PrebuiltPackager;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::app::AppRef;

/// Errors from the packaging operation.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The app's payload does not exist or is not a file.
    #[error("no deployable payload at {0}")]
    MissingPayload(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The opaque bundle → installable payload operation.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Produce the deployable package for `app`, returning its location.
    async fn package(&self, app: &AppRef) -> Result<PathBuf, PackagerError>;
}
