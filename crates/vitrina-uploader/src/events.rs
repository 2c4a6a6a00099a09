//! Host-facing event sink.
//!
//! The orchestrator never surfaces errors through `submit`; everything the
//! host form needs to render flows through this trait. Implementations must
//! not block: callbacks fire from session tasks.

use vitrina_core::error::ValidationError;
use vitrina_core::models::AssetSnapshot;

/// Why a candidate was dropped before a session was created.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error(transparent)]
    Validation(ValidationError),

    #[error("no upload slots available")]
    NoCapacity,
}

/// Sink the host form implements to observe upload progress.
///
/// `assets_changed` always receives a freshly built replacement list; the
/// orchestrator never hands out a shared reference to its own state.
pub trait UploadEvents: Send + Sync {
    /// Invoked on every committed-list change (multi-slot mode). Index 0 is
    /// the semantic cover.
    fn assets_changed(&self, assets: Vec<String>);

    /// Single-slot counterpart of `assets_changed`.
    fn thumbnail_changed(&self, url: Option<String>);

    /// Per-asset state transition, including terminal failures.
    fn asset_updated(&self, snapshot: AssetSnapshot);

    /// A candidate was dropped pre-network: validation failure or overflow
    /// beyond slot capacity. Hosts decide how visible to make this.
    fn asset_rejected(&self, file_name: &str, reason: RejectReason);
}

/// No-op implementation for hosts that only poll orchestrator state.
pub struct NoOpUploadEvents;

impl UploadEvents for NoOpUploadEvents {
    fn assets_changed(&self, _assets: Vec<String>) {}

    fn thumbnail_changed(&self, _url: Option<String>) {}

    fn asset_updated(&self, _snapshot: AssetSnapshot) {}

    fn asset_rejected(&self, _file_name: &str, _reason: RejectReason) {}
}
