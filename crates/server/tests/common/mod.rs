//! Common test utilities for exercising the management API in-process.
//!
//! Builds the axum router over mock collaborators so tests can create bulk
//! runs without a signing toolchain, while the install server underneath
//! still binds a real local port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use airlift_core::{
    testing::{MockPackager, MockSigner, MockTrigger},
    BulkOrchestrator, Config, InstallTrigger, OrchestratorConfig, Packager, Signer,
};
use airlift_server::api::create_router;
use airlift_server::state::AppState;

/// Test fixture holding the router and its mock collaborators.
pub struct TestFixture {
    pub router: Router,
    pub signer: Arc<MockSigner>,
    pub packager: Arc<MockPackager>,
    pub trigger: Arc<MockTrigger>,
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with fast orchestrator timings.
    pub async fn new() -> Self {
        let mut config = Config::default();
        config.orchestrator = OrchestratorConfig {
            inter_trigger_delay_ms: 5,
            completion_poll_interval_ms: 10,
        };
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Self {
        let signer = Arc::new(MockSigner::new());
        let packager = Arc::new(MockPackager::new());
        let trigger = Arc::new(MockTrigger::new());

        let orchestrator = Arc::new(BulkOrchestrator::new(
            config.orchestrator.clone(),
            config.installer.clone(),
            Arc::clone(&signer) as Arc<dyn Signer>,
            Arc::clone(&packager) as Arc<dyn Packager>,
            Arc::clone(&trigger) as Arc<dyn InstallTrigger>,
        ));

        let state = Arc::new(AppState::new(config, orchestrator));
        let router = create_router(state);

        Self {
            router,
            signer,
            packager,
            trigger,
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
