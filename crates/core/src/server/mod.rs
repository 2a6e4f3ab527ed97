//! The ephemeral OTA install server.
//!
//! Binds an HTTP listener on a random local port and serves the
//! over-the-air install protocol for every package in its registry: a
//! browser-facing redirect page, a property-list manifest, and the payload
//! stream itself. Per-package status advances as the device walks through
//! the protocol.

mod assets;
mod error;
mod install_server;
mod manifest;
mod routes;
mod stream;

pub use assets::{DISPLAY_IMAGE_LARGE_PATH, DISPLAY_IMAGE_SMALL_PATH};
pub use error::ServerError;
pub use install_server::{InstallServer, InstallServerConfig, MAX_BIND_ATTEMPTS, PORT_RANGE};
pub use manifest::install_manifest;
