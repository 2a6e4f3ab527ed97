//! Code-signing seam.
//!
//! Signing is an opaque external operation: given an app, per-app options
//! and a certificate, produce a newly signed app or an error. The trait
//! exists so the orchestrator can await it directly and tests can script it.

mod command;
mod none;
mod types;

pub use command::CommandSigner;
pub use none::NoneSigner;
pub use types::{CertificateRef, SignerError, SigningContext, SigningOptions, SigningRequest};

use async_trait::async_trait;

use crate::app::AppRef;

/// The opaque code-signing operation.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `app`, returning the signed app (with its fresh record id).
    async fn sign(&self, app: &AppRef, request: &SigningRequest) -> Result<AppRef, SignerError>;

    /// Name of the backend, for logs.
    fn backend_name(&self) -> &'static str;
}
