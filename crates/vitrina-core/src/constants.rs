//! Shared constants for upload defaults and progress checkpoints.

/// Progress value for an asset that has not started its handshake.
pub const PROGRESS_QUEUED: u8 = 0;

/// Progress checkpoint once the credential handshake has completed.
///
/// The transport exposes no incremental progress, so this marks "handshake
/// done, bytes in flight" rather than a byte count.
pub const PROGRESS_HANDSHAKE_DONE: u8 = 30;

/// Progress value for a committed asset.
pub const PROGRESS_COMMITTED: u8 = 100;

/// Default number of gallery slots.
pub const DEFAULT_GALLERY_MAX_COUNT: usize = 5;

/// Default size ceiling for gallery and thumbnail images (2 MiB).
pub const DEFAULT_IMAGE_MAX_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Default size ceiling for downloadable product files (100 MiB).
pub const DEFAULT_PRODUCT_FILE_MAX_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// MIME prefixes admitted for image uploads.
pub const DEFAULT_IMAGE_MIME_PREFIXES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Extensions (without leading dot) admitted for product file uploads.
pub const DEFAULT_PRODUCT_FILE_EXTENSIONS: &[&str] = &["zip", "pdf", "rar", "7z"];

/// How long a failed asset keeps its preview visible before cleanup.
pub const DEFAULT_FAILURE_DISPLAY_DELAY_SECS: u64 = 3;

/// Request timeout for the credential handshake.
pub const DEFAULT_BROKER_TIMEOUT_SECS: u64 = 30;

/// Request timeout for the storage write. Generous because product files can
/// be large and the write is not resumable.
pub const DEFAULT_TRANSPORT_TIMEOUT_SECS: u64 = 300;

/// Generic content type used for opaque product files.
pub const OCTET_STREAM: &str = "application/octet-stream";
