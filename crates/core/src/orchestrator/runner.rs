//! Bulk orchestrator implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::app::AppRef;
use crate::installer::InstallerStatus;
use crate::metrics::INSTALL_TRIGGERS;
use crate::packager::Packager;
use crate::server::{InstallServer, InstallServerConfig};
use crate::signer::{Signer, SigningContext};
use crate::trigger::InstallTrigger;

use super::config::OrchestratorConfig;
use super::types::{BulkRun, OrchestratorError};

/// The bulk install orchestrator.
///
/// Holds the collaborators for a whole session; each [`Self::run`] call
/// drives one batch of apps against one freshly started install server.
pub struct BulkOrchestrator {
    config: OrchestratorConfig,
    server_config: InstallServerConfig,
    signer: Arc<dyn Signer>,
    packager: Arc<dyn Packager>,
    trigger: Arc<dyn InstallTrigger>,
}

impl BulkOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        server_config: InstallServerConfig,
        signer: Arc<dyn Signer>,
        packager: Arc<dyn Packager>,
        trigger: Arc<dyn InstallTrigger>,
    ) -> Self {
        Self {
            config,
            server_config,
            signer,
            packager,
            trigger,
        }
    }

    /// Drive one bulk run to completion.
    ///
    /// Packages are processed strictly in input order; a per-package failure
    /// is logged and skipped, never propagated to the rest of the batch.
    /// Cancellation stops future triggers and ends the completion wait
    /// early; it never aborts a device-side install already triggered.
    pub async fn run(
        &self,
        apps: Vec<AppRef>,
        signing: Option<SigningContext>,
        run: Arc<BulkRun>,
        cancel: CancellationToken,
    ) -> Result<(), OrchestratorError> {
        if signing.is_some() {
            run.append_log("Starting batch signing & installation...").await;
        } else {
            run.append_log("Starting batch installation...").await;
        }

        // One server for the whole run. A bind failure is fatal: nothing has
        // been triggered yet, so the run ends here.
        let server = match InstallServer::start(self.server_config.clone()).await {
            Ok(server) => Arc::new(server),
            Err(e) => {
                run.append_log(format!("Critical error: failed to start install server: {e}"))
                    .await;
                run.mark_finished();
                return Err(e.into());
            }
        };
        run.append_log(format!("Install server started on port {}", server.port()))
            .await;
        run.attach_server(Arc::clone(&server));

        for (index, app) in apps.iter().enumerate() {
            if cancel.is_cancelled() {
                run.append_log(format!(
                    "Cancelled; skipping {} remaining package(s)",
                    apps.len() - index
                ))
                .await;
                break;
            }

            let status = run.add_package(&app.name).await;

            let app_to_install = match &signing {
                Some(context) => {
                    run.append_log(format!("Signing {}...", app.name)).await;
                    match self.signer.sign(app, &context.request_for(&app.uuid)).await {
                        Ok(signed) => signed,
                        Err(e) => {
                            run.append_log(format!("Error signing {}: {e}", app.name)).await;
                            status.advance(InstallerStatus::Broken {
                                reason: format!("signing failed: {e}"),
                            });
                            continue;
                        }
                    }
                }
                None => app.clone(),
            };

            run.append_log(format!("Packaging {}...", app_to_install.name)).await;
            let package_path = match self.packager.package(&app_to_install).await {
                Ok(path) => path,
                Err(e) => {
                    run.append_log(format!("Error packaging {}: {e}", app_to_install.name))
                        .await;
                    status.advance(InstallerStatus::Broken {
                        reason: format!("packaging failed: {e}"),
                    });
                    continue;
                }
            };

            let id = Uuid::new_v4().to_string();
            server
                .register(
                    &id,
                    app_to_install.package_info(),
                    package_path,
                    status.clone(),
                )
                .await;
            run.record_registration(index, &id, server.install_link(&id), server.page_link(&id))
                .await;

            // Triggering only initiates the install; completion is driven by
            // the payload transfer on the server side.
            status.advance(InstallerStatus::Ready);
            run.append_log(format!("Requesting install for {}...", app_to_install.name))
                .await;
            if let Err(e) = self.trigger.open(&server.install_link(&id)).await {
                run.append_log(format!(
                    "Error triggering install for {}: {e}",
                    app_to_install.name
                ))
                .await;
                status.advance(InstallerStatus::Broken {
                    reason: format!("trigger failed: {e}"),
                });
                continue;
            }
            INSTALL_TRIGGERS.inc();

            // Let the device's install prompt settle before the next one.
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(Duration::from_millis(self.config.inter_trigger_delay_ms)) => {}
            }
        }

        run.append_log("All operations sent. Waiting for transfers to complete...")
            .await;

        loop {
            let statuses = run.statuses().await;
            let pending = statuses.iter().filter(|s| !s.is_terminal()).count();
            if pending == 0 {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    run.append_log(format!(
                        "Cancelled while waiting; {pending} package(s) not terminal"
                    ))
                    .await;
                    return Ok(());
                }
                _ = sleep(Duration::from_millis(self.config.completion_poll_interval_ms)) => {}
            }
        }

        run.append_log("All operations completed.").await;
        run.mark_finished();
        Ok(())
    }
}
