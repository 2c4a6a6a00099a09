//! Ephemeral preview handles.
//!
//! A session allocates a preview the moment its file is admitted so the host
//! can render instant feedback, long before any byte reaches storage. The
//! handle is exclusively owned by its session and released exactly once: on
//! commit, after the failure display delay, or on cancellation. `Drop` is the
//! backstop, so a panicking session cannot leak an entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use uuid::Uuid;

type Entries = Arc<Mutex<HashMap<String, Bytes>>>;

/// Mints `preview://` URIs backed by in-memory bytes.
///
/// The host resolves a URI to bytes when rendering; once the owning session
/// reaches a terminal state the URI stops resolving.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Entries,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self, data: Bytes) -> PreviewHandle {
        let uri = format!("preview://{}", Uuid::new_v4());
        self.lock().insert(uri.clone(), data);
        PreviewHandle {
            uri,
            entries: Arc::clone(&self.entries),
            released: false,
        }
    }

    /// Bytes behind a preview URI, if its handle is still live.
    pub fn resolve(&self, uri: &str) -> Option<Bytes> {
        self.lock().get(uri).cloned()
    }

    /// Number of live handles. Returns to zero once every session has
    /// reached a terminal state or been cancelled.
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bytes>> {
        // Recover the map even if a holder panicked mid-operation.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Exclusive ownership of one preview URI.
#[derive(Debug)]
pub struct PreviewHandle {
    uri: String,
    entries: Entries,
    released: bool,
}

impl PreviewHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Release the preview, consuming the handle.
    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if !self.released {
            self.entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.uri);
            self.released = true;
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release_now();
    }
}
