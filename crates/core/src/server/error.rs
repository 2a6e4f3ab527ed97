//! Install server errors.

use thiserror::Error;

/// Errors that can occur while running the install server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not find a free port in the ephemeral range.
    #[error("failed to bind a port after {attempts} attempts")]
    BindFailure { attempts: u32 },

    /// Underlying socket error other than a port collision.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
