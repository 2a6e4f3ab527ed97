//! Per-package install status state machine.

mod status;

pub use status::{InstallOutcome, InstallerStatus, StatusHandle};
