//! Bulk install orchestrator.
//!
//! Drives N packages through sign → package → register → trigger against a
//! single shared install server, strictly in input order with a fixed
//! inter-trigger delay, then polls until every package reaches a terminal
//! status. Per-package failures are isolated; only a server bind failure
//! aborts the whole run.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::BulkOrchestrator;
pub use types::{BulkRun, LogEntry, OrchestratorError, RunPackageView};
