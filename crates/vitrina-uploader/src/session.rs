//! Per-asset upload session state machine.
//!
//! `Queued → RequestingCredential → Uploading → Committed | Failed`. One
//! session per admitted file, each running as its own task; sessions share
//! nothing except the orchestrator's fold step. Cancellation of the session's
//! token aborts the in-flight call at either suspension point.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use vitrina_core::error::{CredentialError, TransportError, UploadError};
use vitrina_core::models::{Asset, AssetState, CandidateFile};
use vitrina_core::retry::RetryPolicy;

use crate::orchestrator::{OrchestratorShared, UploaderMode};
use crate::preview::PreviewHandle;

pub(crate) struct UploadSession {
    asset: Asset,
    file: CandidateFile,
    preview: Option<PreviewHandle>,
    shared: Arc<OrchestratorShared>,
    cancel: CancellationToken,
}

impl UploadSession {
    pub(crate) fn new(
        asset: Asset,
        file: CandidateFile,
        preview: PreviewHandle,
        shared: Arc<OrchestratorShared>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            asset,
            file,
            preview: Some(preview),
            shared,
            cancel,
        }
    }

    #[tracing::instrument(skip(self), fields(asset_id = %self.asset.id(), file_name = %self.asset.file_name()))]
    pub(crate) async fn run(mut self) {
        // The handshake fires immediately on admission.
        self.transition(AssetState::RequestingCredential);

        let broker = self.shared.broker.clone();
        let file_name = self.file.file_name.clone();
        let content_type = self.file.content_type.clone();
        let credential = match run_with_retry(
            &self.shared.config.retry,
            &self.cancel,
            CredentialError::is_transient,
            move || {
                let broker = broker.clone();
                let file_name = file_name.clone();
                let content_type = content_type.clone();
                async move { broker.request_credential(&file_name, &content_type).await }
            },
        )
        .await
        {
            Some(Ok(credential)) => credential,
            Some(Err(err)) => return self.fail(err.into()).await,
            None => return self.aborted().await,
        };

        // Handshake done; the write carries no incremental progress.
        self.transition(AssetState::Uploading);

        let transport = self.shared.transport.clone();
        let write_url = credential.write_url.clone();
        let data = self.file.data.clone();
        let content_type = self.file.content_type.clone();
        let written = run_with_retry(
            &self.shared.config.retry,
            &self.cancel,
            TransportError::is_transient,
            move || {
                let transport = transport.clone();
                let write_url = write_url.clone();
                let data = data.clone();
                let content_type = content_type.clone();
                async move { transport.put_bytes(&write_url, data, &content_type).await }
            },
        )
        .await;

        match written {
            Some(Ok(())) => self.commit(credential.public_url).await,
            Some(Err(err)) => self.fail(err.into()).await,
            None => self.aborted().await,
        }
    }

    fn transition(&mut self, state: AssetState) {
        self.asset.set_state(state);
        self.shared.events.asset_updated(self.asset.snapshot());
    }

    /// Fold the committed URL into the shared list and report the change.
    /// Completion order, not submission order, decides list order.
    async fn commit(mut self, public_url: String) {
        self.asset.set_state(AssetState::Committed {
            public_url: public_url.clone(),
        });

        let committed = {
            let mut state = self.shared.state.lock().await;
            state.in_flight -= 1;
            state.committed = match self.shared.mode {
                UploaderMode::Gallery => {
                    let mut next = state.committed.clone();
                    next.push(public_url.clone());
                    next
                }
                UploaderMode::SingleSlot => vec![public_url.clone()],
            };
            state.committed.clone()
        };

        if let Some(preview) = self.preview.take() {
            preview.release();
        }

        tracing::info!(
            asset_id = %self.asset.id(),
            public_url = %public_url,
            "asset committed"
        );

        self.shared.events.asset_updated(self.asset.snapshot());
        match self.shared.mode {
            UploaderMode::Gallery => self.shared.events.assets_changed(committed),
            UploaderMode::SingleSlot => self
                .shared
                .events
                .thumbnail_changed(committed.first().cloned()),
        }
    }

    /// Record the failure, free the slot, and keep the preview visible for
    /// the display delay before cleanup. Failed assets never reach the
    /// committed list.
    async fn fail(mut self, err: UploadError) {
        tracing::warn!(
            asset_id = %self.asset.id(),
            file_name = %self.asset.file_name(),
            error = %err,
            "upload failed"
        );

        self.asset.set_state(AssetState::Failed {
            error: err.to_string(),
        });

        {
            let mut state = self.shared.state.lock().await;
            state.in_flight -= 1;
        }

        self.shared.events.asset_updated(self.asset.snapshot());

        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = tokio::time::sleep(self.shared.config.failure_display_delay) => {}
        }

        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }

    /// The owning orchestrator was shut down: free the slot and the preview.
    /// No events fire; there is no context left to render into.
    async fn aborted(mut self) {
        tracing::debug!(asset_id = %self.asset.id(), "session cancelled");

        {
            let mut state = self.shared.state.lock().await;
            state.in_flight -= 1;
        }

        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }
}

/// Run `op` until success, a permanent error, retry exhaustion, or
/// cancellation. Returns `None` when cancelled.
async fn run_with_retry<T, E, Fut, Op>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    is_transient: fn(&E) -> bool,
    mut op: Op,
) -> Option<Result<T, E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = op() => result,
        };

        match result {
            Ok(value) => return Some(Ok(value)),
            Err(err) if attempt < policy.max_retries && is_transient(&err) => {
                let delay = policy.backoff_delay(attempt);
                tracing::debug!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after transient failure"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(err) => return Some(Err(err)),
        }
    }
}
