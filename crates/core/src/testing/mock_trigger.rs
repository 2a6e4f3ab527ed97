//! Mock install trigger for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::trigger::{InstallTrigger, TriggerError};

/// Mock implementation of the [`InstallTrigger`] trait.
///
/// Records every opened URI in call order; can be scripted to fail.
#[derive(Debug, Default)]
pub struct MockTrigger {
    opened: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future open call fail.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// URIs opened so far, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstallTrigger for MockTrigger {
    async fn open(&self, uri: &str) -> Result<(), TriggerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TriggerError::CommandFailed("mock failure".to_string()));
        }
        self.opened.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}
