use std::collections::HashMap;
use std::sync::Arc;

use airlift_core::{BulkOrchestrator, BulkRun, Config, SanitizedConfig};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// One bulk run tracked by the API.
#[derive(Clone)]
pub struct RunEntry {
    pub run: Arc<BulkRun>,
    pub cancel: CancellationToken,
}

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<BulkOrchestrator>,
    runs: RwLock<HashMap<String, RunEntry>>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<BulkOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
            runs: RwLock::new(HashMap::new()),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> Arc<BulkOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    pub async fn insert_run(&self, entry: RunEntry) {
        self.runs
            .write()
            .await
            .insert(entry.run.id().to_string(), entry);
    }

    pub async fn get_run(&self, id: &str) -> Option<RunEntry> {
        self.runs.read().await.get(id).cloned()
    }

    pub async fn list_runs(&self) -> Vec<RunEntry> {
        self.runs.read().await.values().cloned().collect()
    }
}
