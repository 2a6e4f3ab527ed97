//! Passthrough signer.

use async_trait::async_trait;

use crate::app::AppRef;

use super::{Signer, SignerError, SigningRequest};

/// Signer that returns the app unchanged.
///
/// Used when the payloads are already signed, or when signing happens
/// upstream of this tool entirely.
#[derive(Debug, Default)]
pub struct NoneSigner;

impl NoneSigner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Signer for NoneSigner {
    async fn sign(&self, app: &AppRef, _request: &SigningRequest) -> Result<AppRef, SignerError> {
        Ok(app.clone())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
