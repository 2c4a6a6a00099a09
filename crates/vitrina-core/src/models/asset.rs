//! Per-asset lifecycle state.
//!
//! The state is a tagged variant per lifecycle stage so that illegal
//! combinations (a committed asset with an error message, a failed asset with
//! a public URL) are unrepresentable.

use serde::Serialize;
use uuid::Uuid;

use crate::constants::{PROGRESS_COMMITTED, PROGRESS_HANDSHAKE_DONE, PROGRESS_QUEUED};

/// Lifecycle stage of one tracked upload.
///
/// `Queued → RequestingCredential → Uploading → Committed | Failed`;
/// both `Committed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Queued,
    RequestingCredential,
    Uploading,
    Committed { public_url: String },
    Failed { error: String },
}

/// Flat discriminant of [`AssetState`], for snapshots and host UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Queued,
    RequestingCredential,
    Uploading,
    Committed,
    Failed,
}

impl AssetState {
    pub fn status(&self) -> AssetStatus {
        match self {
            AssetState::Queued => AssetStatus::Queued,
            AssetState::RequestingCredential => AssetStatus::RequestingCredential,
            AssetState::Uploading => AssetStatus::Uploading,
            AssetState::Committed { .. } => AssetStatus::Committed,
            AssetState::Failed { .. } => AssetStatus::Failed,
        }
    }

    /// Fixed progress checkpoints (0 / 30 / 100). The transport exposes no
    /// byte counts, so progress marks protocol phases, not bytes transferred.
    /// Failed assets read 0; hosts render the error in place of the bar.
    pub fn progress(&self) -> u8 {
        match self {
            AssetState::Queued | AssetState::RequestingCredential => PROGRESS_QUEUED,
            AssetState::Uploading => PROGRESS_HANDSHAKE_DONE,
            AssetState::Committed { .. } => PROGRESS_COMMITTED,
            AssetState::Failed { .. } => PROGRESS_QUEUED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetState::Committed { .. } | AssetState::Failed { .. })
    }
}

/// One uploadable binary tracked by the orchestrator, alive from admission
/// until its terminal state.
#[derive(Debug, Clone)]
pub struct Asset {
    id: Uuid,
    file_name: String,
    preview_uri: String,
    state: AssetState,
}

impl Asset {
    pub fn new(file_name: impl Into<String>, preview_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            preview_uri: preview_uri.into(),
            state: AssetState::Queued,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn state(&self) -> &AssetState {
        &self.state
    }

    /// Transition to a new state. Terminal states are sticky; transitioning
    /// out of one is a logic error and panics in debug builds.
    pub fn set_state(&mut self, state: AssetState) {
        debug_assert!(
            !self.state.is_terminal(),
            "asset {} already terminal",
            self.id
        );
        self.state = state;
    }

    /// Point-in-time view of the asset for event sinks.
    pub fn snapshot(&self) -> AssetSnapshot {
        AssetSnapshot {
            id: self.id,
            file_name: self.file_name.clone(),
            preview_uri: self.preview_uri.clone(),
            status: self.state.status(),
            progress: self.state.progress(),
            error_message: match &self.state {
                AssetState::Failed { error } => Some(error.clone()),
                _ => None,
            },
            committed_url: match &self.state {
                AssetState::Committed { public_url } => Some(public_url.clone()),
                _ => None,
            },
        }
    }
}

/// Immutable view of an asset emitted on every state transition.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSnapshot {
    pub id: Uuid,
    pub file_name: String,
    pub preview_uri: String,
    pub status: AssetStatus,
    pub progress: u8,
    pub error_message: Option<String>,
    pub committed_url: Option<String>,
}
