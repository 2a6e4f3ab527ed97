pub mod app;
pub mod config;
pub mod installer;
pub mod metrics;
pub mod orchestrator;
pub mod packager;
pub mod registry;
pub mod server;
pub mod signer;
pub mod testing;
pub mod trigger;

pub use app::AppRef;
pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, Config, ConfigError,
    SanitizedConfig, SignerBackend, SigningConfig, StagingConfig, TriggerBackend, TriggerConfig,
};
pub use installer::{InstallOutcome, InstallerStatus, StatusHandle};
pub use orchestrator::{
    BulkOrchestrator, BulkRun, LogEntry, OrchestratorConfig, OrchestratorError, RunPackageView,
};
pub use packager::{Packager, PackagerError, PrebuiltPackager};
pub use registry::{PackageInfo, PackageRegistry, RegisteredPackage};
pub use server::{
    install_manifest, InstallServer, InstallServerConfig, ServerError, DISPLAY_IMAGE_LARGE_PATH,
    DISPLAY_IMAGE_SMALL_PATH, MAX_BIND_ATTEMPTS, PORT_RANGE,
};
pub use signer::{
    CertificateRef, CommandSigner, NoneSigner, Signer, SignerError, SigningContext,
    SigningOptions, SigningRequest,
};
pub use trigger::{CommandTrigger, InstallTrigger, LogTrigger, TriggerError};
