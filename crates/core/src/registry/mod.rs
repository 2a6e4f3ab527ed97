//! Registry of packages currently installable from one server instance.

mod types;

pub use types::{PackageInfo, PackageRegistry, RegisteredPackage};
