//! Install server lifecycle: random-port binding, serving, shutdown.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::installer::StatusHandle;
use crate::metrics::{BIND_RETRIES, PACKAGES_REGISTERED};
use crate::registry::{PackageInfo, PackageRegistry, RegisteredPackage};

use super::error::ServerError;
use super::routes::install_router;

/// Ephemeral port range the server picks from, one port per instance.
pub const PORT_RANGE: std::ops::Range<u16> = 4000..8000;

/// Bind attempts before giving up with [`ServerError::BindFailure`].
pub const MAX_BIND_ATTEMPTS: u32 = 16;

/// Install server configuration.
///
/// The port is deliberately absent: it is chosen at random from
/// [`PORT_RANGE`] on every start so parallel instances never fight over a
/// fixed port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallServerConfig {
    /// Address the listener binds to.
    #[serde(default = "default_bind_host")]
    pub bind_host: IpAddr,

    /// Host embedded in every link and manifest the instance generates.
    /// Must be reachable from the device, so typically the machine's LAN
    /// address rather than a loopback.
    #[serde(default = "default_advertised_host")]
    pub advertised_host: String,
}

impl Default for InstallServerConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            advertised_host: default_advertised_host(),
        }
    }
}

fn default_bind_host() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_advertised_host() -> String {
    "127.0.0.1".to_string()
}

/// The device-install URI: opening it makes the OS installer fetch the
/// manifest and drive the rest of the protocol itself.
pub(super) fn device_install_link(base_url: &str, id: &str) -> String {
    format!("itms-services://?action=download-manifest&url={base_url}/{id}.plist")
}

/// An ephemeral, in-process OTA install server.
///
/// One instance serves every package registered with it for the lifetime of
/// a bulk run; the owning session keeps it alive until in-flight device
/// installs can no longer need the manifest or payload.
pub struct InstallServer {
    port: u16,
    base_url: String,
    registry: Arc<PackageRegistry>,
    shutdown_tx: broadcast::Sender<()>,
    shut_down: AtomicBool,
}

impl InstallServer {
    /// Bind a random port in [`PORT_RANGE`] and start serving.
    ///
    /// A port collision is retried with a fresh random port up to
    /// [`MAX_BIND_ATTEMPTS`] times before failing.
    pub async fn start(config: InstallServerConfig) -> Result<Self, ServerError> {
        let (listener, port) =
            bind_in_range(config.bind_host, PORT_RANGE.start, PORT_RANGE.end, MAX_BIND_ATTEMPTS)
                .await?;

        let base_url = format!("https://{}:{}", config.advertised_host, port);
        let registry = Arc::new(PackageRegistry::new());
        let router = install_router(Arc::clone(&registry), base_url.clone());

        let (shutdown_tx, _) = broadcast::channel(1);
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.recv().await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!(error = %e, "install server terminated abnormally");
            }
        });

        info!(port, "install server listening");

        Ok(Self {
            port,
            base_url,
            registry,
            shutdown_tx,
            shut_down: AtomicBool::new(false),
        })
    }

    /// The port this instance bound.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Advertised scheme/host/port, no trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn registry(&self) -> &Arc<PackageRegistry> {
        &self.registry
    }

    /// Make a package installable under `id`.
    pub async fn register(
        &self,
        id: &str,
        info: PackageInfo,
        package_path: PathBuf,
        status: StatusHandle,
    ) {
        self.registry
            .register(
                id,
                RegisteredPackage {
                    info,
                    package_path,
                    status,
                },
            )
            .await;
        PACKAGES_REGISTERED.inc();
    }

    /// Device-facing deep link that kicks off the native installer.
    pub fn install_link(&self, id: &str) -> String {
        device_install_link(&self.base_url, id)
    }

    /// Browser-facing page that redirects to [`Self::install_link`].
    pub fn page_link(&self, id: &str) -> String {
        format!("{}/install/{}", self.base_url, id)
    }

    /// Stop accepting connections and release the port.
    ///
    /// Idempotent; repeat calls are no-ops. Also invoked from `Drop` so an
    /// owner that forgets cannot leak the listener.
    pub fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::SeqCst) {
            let _ = self.shutdown_tx.send(());
            info!(port = self.port, "install server shut down");
        }
    }
}

impl Drop for InstallServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Try random ports in `[lo, hi)` until one binds.
///
/// Only a port collision triggers a retry; any other socket error is
/// propagated as-is.
async fn bind_in_range(
    host: IpAddr,
    lo: u16,
    hi: u16,
    max_attempts: u32,
) -> Result<(TcpListener, u16), ServerError> {
    for attempt in 1..=max_attempts {
        // ThreadRng is !Send, keep it scoped so the future stays Send.
        let port = { rand::thread_rng().gen_range(lo..hi) };
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(port, attempt, "port in use, retrying with a new one");
                BIND_RETRIES.inc();
            }
            Err(e) => return Err(ServerError::Io(e)),
        }
    }
    Err(ServerError::BindFailure {
        attempts: max_attempts,
    })
}
