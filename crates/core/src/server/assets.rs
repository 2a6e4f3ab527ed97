//! Fixed static assets referenced by install manifests.
//!
//! The device installer fetches a small and a large display icon from the
//! reserved paths below. Both serve the same embedded placeholder PNG; the
//! protocol only requires the paths to resolve to image bytes.

/// Reserved path for the small display icon.
pub const DISPLAY_IMAGE_SMALL_PATH: &str = "/display-image-small.png";

/// Reserved path for the large display icon.
pub const DISPLAY_IMAGE_LARGE_PATH: &str = "/display-image-large.png";

/// 1x1 transparent PNG used as the placeholder display icon.
pub(crate) const PLACEHOLDER_ICON_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
    0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];
