use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airlift_core::{
    load_config, validate_config, BulkOrchestrator, CommandSigner, CommandTrigger, InstallTrigger,
    LogTrigger, NoneSigner, Packager, PrebuiltPackager, Signer, SignerBackend, TriggerBackend,
};

use airlift_server::api::create_router;
use airlift_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("airlift {}", VERSION);

    // Determine config path
    let config_path = std::env::var("AIRLIFT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Advertised host: {}", config.installer.advertised_host);
    info!("Signing backend: {:?}", config.signing.backend);
    info!("Trigger backend: {:?}", config.trigger.backend);

    // Log a config fingerprint so runs can be correlated to a configuration
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Build collaborators from the configured backends
    let signer: Arc<dyn Signer> = match config.signing.backend {
        SignerBackend::None => Arc::new(NoneSigner::new()),
        SignerBackend::Command => {
            let command = config
                .signing
                .command
                .clone()
                .context("signing.command missing")?;
            Arc::new(CommandSigner::new(command))
        }
    };
    info!("Using signer: {}", signer.backend_name());

    let packager: Arc<dyn Packager> = Arc::new(PrebuiltPackager::new(config.staging.dir.clone()));

    let trigger: Arc<dyn InstallTrigger> = match config.trigger.backend {
        TriggerBackend::Log => Arc::new(LogTrigger::new()),
        TriggerBackend::Command => {
            let command = config
                .trigger
                .command
                .clone()
                .context("trigger.command missing")?;
            Arc::new(CommandTrigger::new(command))
        }
    };

    let orchestrator = Arc::new(BulkOrchestrator::new(
        config.orchestrator.clone(),
        config.installer.clone(),
        signer,
        packager,
        trigger,
    ));

    let state = Arc::new(AppState::new(config.clone(), orchestrator));
    let router = create_router(state);

    let addr = SocketAddr::new(config.api.host, config.api.port);
    info!("Management API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind management API on {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
