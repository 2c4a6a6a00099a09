//! Upload orchestrator.
//!
//! Accepts batches of candidate files, runs validation and slot allocation,
//! spawns one concurrent session per admitted file, and folds completions
//! into the committed list in completion order. `submit` never returns an
//! error: partial failure is absorbed internally and the host keeps
//! functioning, degrading to per-item manual retry.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use vitrina_client::{Auth, CredentialBroker, HttpCredentialBroker, HttpTransport, Transport};
use vitrina_core::models::{Asset, CandidateFile};
use vitrina_core::validation::validate;
use vitrina_core::UploaderConfig;

use crate::events::{RejectReason, UploadEvents};
use crate::preview::PreviewRegistry;
use crate::session::UploadSession;
use crate::slots::SlotAllocator;

/// Fold semantics for completed sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UploaderMode {
    /// Completions append to the committed list.
    Gallery,
    /// Capacity 1: a completion supersedes the committed asset. The
    /// superseded storage object is not deleted here; object lifecycle
    /// belongs to the backend.
    SingleSlot,
}

#[derive(Debug, Default)]
pub(crate) struct ListState {
    pub(crate) committed: Vec<String>,
    pub(crate) in_flight: usize,
}

pub(crate) struct OrchestratorShared {
    pub(crate) config: UploaderConfig,
    pub(crate) mode: UploaderMode,
    pub(crate) broker: Arc<dyn CredentialBroker>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) events: Arc<dyn UploadEvents>,
    pub(crate) state: Mutex<ListState>,
}

/// Client-resident orchestrator for concurrent asset uploads.
///
/// One instance per host form (gallery editor, thumbnail picker, product
/// file field). Dropping the orchestrator cancels every in-flight session.
pub struct Orchestrator {
    shared: Arc<OrchestratorShared>,
    allocator: SlotAllocator,
    previews: PreviewRegistry,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Build an orchestrator over explicit broker/transport implementations.
    /// Fails fast on invalid configuration.
    pub fn new(
        config: UploaderConfig,
        broker: Arc<dyn CredentialBroker>,
        transport: Arc<dyn Transport>,
        events: Arc<dyn UploadEvents>,
    ) -> Result<Self> {
        config.validate()?;

        let mode = if config.max_count == 1 {
            UploaderMode::SingleSlot
        } else {
            UploaderMode::Gallery
        };
        let allocator = SlotAllocator::new(config.max_count);

        Ok(Self {
            shared: Arc::new(OrchestratorShared {
                config,
                mode,
                broker,
                transport,
                events,
                state: Mutex::new(ListState::default()),
            }),
            allocator,
            previews: PreviewRegistry::new(),
            cancel: CancellationToken::new(),
        })
    }

    /// Convenience constructor wiring the HTTP broker and transport from
    /// environment configuration (VITRINA_API_URL, VITRINA_API_KEY).
    pub fn from_env(config: UploaderConfig, events: Arc<dyn UploadEvents>) -> Result<Self> {
        let broker = HttpCredentialBroker::from_env()?;
        let transport = HttpTransport::new()?;
        Self::new(config, Arc::new(broker), Arc::new(transport), events)
    }

    /// Convenience constructor for an explicit backend address.
    pub fn with_backend(
        config: UploaderConfig,
        base_url: String,
        auth: Auth,
        events: Arc<dyn UploadEvents>,
    ) -> Result<Self> {
        let broker = HttpCredentialBroker::new(base_url, auth)?;
        let transport = HttpTransport::new()?;
        Self::new(config, Arc::new(broker), Arc::new(transport), events)
    }

    /// Submit a batch of candidate files.
    ///
    /// Validates, admits against live capacity, and spawns one session per
    /// admitted file; all sessions run concurrently and complete in any
    /// order. Rejected candidates are reported through the event sink and
    /// otherwise dropped. An empty batch is a no-op.
    #[tracing::instrument(skip_all, fields(candidates = files.len()))]
    pub async fn submit(&self, files: Vec<CandidateFile>) {
        if files.is_empty() {
            return;
        }

        let mut valid = Vec::new();
        for file in files {
            match validate(&file, &self.shared.config.constraints) {
                Ok(()) => valid.push(file),
                Err(err) => {
                    // Low visibility on purpose: a bulk drop with one bad
                    // file should not interrupt the rest. The sink decides
                    // whether to surface it.
                    tracing::debug!(
                        file_name = %file.file_name,
                        error = %err,
                        "candidate rejected by validation"
                    );
                    self.shared
                        .events
                        .asset_rejected(&file.file_name, RejectReason::Validation(err));
                }
            }
        }
        if valid.is_empty() {
            return;
        }

        // Admission and the in-flight bump happen under one lock so that two
        // concurrent submits cannot oversubscribe the slots.
        let (admitted, overflow) = {
            let mut state = self.shared.state.lock().await;
            let committed_count = match self.shared.mode {
                UploaderMode::Gallery => state.committed.len(),
                // A new thumbnail supersedes the committed one, so the
                // committed slot does not block admission.
                UploaderMode::SingleSlot => 0,
            };
            let (admitted, overflow) =
                self.allocator.admit(valid, committed_count, state.in_flight);
            state.in_flight += admitted.len();
            (admitted, overflow)
        };

        for file in overflow {
            tracing::warn!(
                file_name = %file.file_name,
                max_total = self.allocator.max_total(),
                "candidate dropped: no upload slots available"
            );
            self.shared
                .events
                .asset_rejected(&file.file_name, RejectReason::NoCapacity);
        }

        for file in admitted {
            let preview = self.previews.allocate(file.data.clone());
            let asset = Asset::new(file.file_name.clone(), preview.uri());
            tracing::info!(
                asset_id = %asset.id(),
                file_name = %file.file_name,
                size_bytes = file.size(),
                "session admitted"
            );
            self.shared.events.asset_updated(asset.snapshot());

            let session = UploadSession::new(
                asset,
                file,
                preview,
                Arc::clone(&self.shared),
                self.cancel.child_token(),
            );
            tokio::spawn(session.run());
        }
    }

    /// Adopt the host's committed list (initial load, manual reorder or
    /// removal). The orchestrator keeps only this snapshot for slot
    /// accounting; the host remains the owner.
    pub async fn sync_committed(&self, urls: Vec<String>) {
        let mut state = self.shared.state.lock().await;
        state.committed = urls;
    }

    /// Snapshot of the current committed list (a fresh `Vec`, never a view
    /// into internal state).
    pub async fn committed(&self) -> Vec<String> {
        self.shared.state.lock().await.committed.clone()
    }

    pub async fn in_flight(&self) -> usize {
        self.shared.state.lock().await.in_flight
    }

    /// Registry backing the `preview://` URIs handed out in snapshots.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Cancel every in-flight session. Sessions abort at their next
    /// suspension point, release their previews, and emit no further events.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
