//! Bulk run API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use airlift_core::{AppRef, BulkRun, LogEntry, RunPackageView, SigningContext};

use crate::state::{AppState, RunEntry};

// ============================================================================
// Request/Response Types
// ============================================================================

/// One app in a run creation request.
#[derive(Debug, Deserialize)]
pub struct RunAppBody {
    /// Library record id; generated when absent.
    pub uuid: Option<String>,
    pub name: String,
    pub bundle_identifier: String,
    pub bundle_version: String,
    /// Path to the app's deployable payload on this host.
    pub bundle_path: PathBuf,
}

/// Request body for creating a bulk run.
#[derive(Debug, Deserialize)]
pub struct CreateRunBody {
    pub apps: Vec<RunAppBody>,
    /// When present, each app is signed before packaging.
    #[serde(default)]
    pub signing: Option<SigningContext>,
}

/// Response for run creation.
#[derive(Debug, Serialize)]
pub struct CreateRunResponse {
    pub id: String,
}

/// Summary of one run for listings.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub finished: bool,
    pub total_packages: usize,
    pub terminal_packages: usize,
}

/// Full view of one run.
#[derive(Debug, Serialize)]
pub struct RunDetail {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub finished: bool,
    /// Port of the run's install server, once it has started.
    pub server_port: Option<u16>,
    pub packages: Vec<RunPackageView>,
    pub log: Vec<LogEntry>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_run(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRunBody>,
) -> impl IntoResponse {
    if body.apps.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "apps must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let apps: Vec<AppRef> = body
        .apps
        .into_iter()
        .map(|app| AppRef {
            uuid: app.uuid.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: app.name,
            bundle_identifier: app.bundle_identifier,
            bundle_version: app.bundle_version,
            bundle_path: app.bundle_path,
        })
        .collect();

    let run = BulkRun::new();
    let cancel = CancellationToken::new();
    let id = run.id().to_string();

    state
        .insert_run(RunEntry {
            run: Arc::clone(&run),
            cancel: cancel.clone(),
        })
        .await;

    let orchestrator = state.orchestrator();
    let signing = body.signing;
    tokio::spawn(async move {
        // Failures are already recorded in the run's own log.
        if let Err(e) = orchestrator.run(apps, signing, run, cancel).await {
            tracing::error!(error = %e, "bulk run aborted");
        }
    });

    (StatusCode::CREATED, Json(CreateRunResponse { id })).into_response()
}

pub async fn list_runs(State(state): State<Arc<AppState>>) -> Json<Vec<RunSummary>> {
    let mut summaries = Vec::new();
    for entry in state.list_runs().await {
        let packages = entry.run.packages().await;
        summaries.push(RunSummary {
            id: entry.run.id().to_string(),
            started_at: entry.run.started_at(),
            finished: entry.run.is_finished(),
            total_packages: packages.len(),
            terminal_packages: packages
                .iter()
                .filter(|p| p.status.is_terminal())
                .count(),
        });
    }
    summaries.sort_by_key(|summary| summary.started_at);
    Json(summaries)
}

pub async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = state.get_run(&id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let detail = RunDetail {
        id: entry.run.id().to_string(),
        started_at: entry.run.started_at(),
        finished: entry.run.is_finished(),
        server_port: entry.run.server().map(|server| server.port()),
        packages: entry.run.packages().await,
        log: entry.run.log().await,
    };
    Json(detail).into_response()
}

pub async fn cancel_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(entry) = state.get_run(&id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    entry.cancel.cancel();
    Json(CancelResponse { cancelled: true }).into_response()
}
