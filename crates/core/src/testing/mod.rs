//! Test doubles for the external collaborators.
//!
//! Used by the crate's own tests and by the server crate's integration
//! tests; compiled unconditionally so downstream test code can depend on it.

pub mod fixtures;
mod mock_packager;
mod mock_signer;
mod mock_trigger;

pub use mock_packager::MockPackager;
pub use mock_signer::MockSigner;
pub use mock_trigger::MockTrigger;
