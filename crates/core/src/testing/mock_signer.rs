//! Mock signer for testing.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::AppRef;
use crate::signer::{Signer, SignerError, SigningRequest};

/// Mock implementation of the [`Signer`] trait.
///
/// Passes apps through unchanged, records which uuids were signed, and can
/// be scripted to fail for specific uuids.
#[derive(Debug, Default)]
pub struct MockSigner {
    fail_uuids: Mutex<HashSet<String>>,
    signed: Mutex<Vec<String>>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future sign call for `uuid` fail.
    pub fn fail_for(&self, uuid: &str) {
        self.fail_uuids
            .lock()
            .unwrap()
            .insert(uuid.to_string());
    }

    /// Uuids signed so far, in call order.
    pub fn signed(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign(&self, app: &AppRef, _request: &SigningRequest) -> Result<AppRef, SignerError> {
        if self.fail_uuids.lock().unwrap().contains(&app.uuid) {
            return Err(SignerError::CommandFailed(format!(
                "mock failure for {}",
                app.uuid
            )));
        }
        self.signed.lock().unwrap().push(app.uuid.clone());
        Ok(app.clone())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
