//! Shared test doubles: scripted broker/transport and a recording sink.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use vitrina_core::error::{CredentialError, TransportError};
use vitrina_core::models::{AssetSnapshot, AssetStatus, CandidateFile, UploadCredential};
use vitrina_core::retry::RetryPolicy;
use vitrina_core::UploaderConfig;
use vitrina_uploader::{CredentialBroker, RejectReason, Transport, UploadEvents};

pub fn image(name: &str, len: usize) -> CandidateFile {
    CandidateFile::new(name, "image/png", Bytes::from(vec![0_u8; len]))
}

pub fn public_url(name: &str) -> String {
    format!("https://cdn.test/{}", name)
}

/// Gallery config with short delays so tests finish quickly.
pub fn fast_config(max_count: usize) -> UploaderConfig {
    let mut config = UploaderConfig::gallery();
    config.max_count = max_count;
    config.failure_display_delay = Duration::from_millis(100);
    config.retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    };
    config
}

/// Log output for failing tests: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Poll until `condition` holds or the timeout elapses.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {:?}",
            timeout
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[derive(Clone)]
pub enum BrokerScript {
    Issue { delay: Duration },
    Reject { status: u16, message: String },
    TransientFailures { failures: u32 },
}

/// Scripted in-memory credential broker, keyed by file name.
#[derive(Default)]
pub struct MockBroker {
    scripts: Mutex<HashMap<String, BrokerScript>>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue_after(&self, file_name: &str, delay: Duration) {
        self.scripts
            .lock()
            .unwrap()
            .insert(file_name.to_string(), BrokerScript::Issue { delay });
    }

    pub fn reject(&self, file_name: &str, status: u16, message: &str) {
        self.scripts.lock().unwrap().insert(
            file_name.to_string(),
            BrokerScript::Reject {
                status,
                message: message.to_string(),
            },
        );
    }

    pub fn fail_transiently(&self, file_name: &str, failures: u32) {
        self.scripts.lock().unwrap().insert(
            file_name.to_string(),
            BrokerScript::TransientFailures { failures },
        );
    }

    pub fn attempts(&self, file_name: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(file_name)
            .copied()
            .unwrap_or(0)
    }
}

fn credential_for(file_name: &str) -> UploadCredential {
    UploadCredential {
        write_url: format!("https://storage.test/put/{}", file_name),
        storage_key: format!("uploads/{}", file_name),
        public_url: public_url(file_name),
    }
}

#[async_trait]
impl CredentialBroker for MockBroker {
    async fn request_credential(
        &self,
        file_name: &str,
        _content_type: &str,
    ) -> Result<UploadCredential, CredentialError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(file_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(file_name)
            .cloned()
            .unwrap_or(BrokerScript::Issue {
                delay: Duration::ZERO,
            });

        match script {
            BrokerScript::Issue { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(credential_for(file_name))
            }
            BrokerScript::Reject { status, message } => {
                Err(CredentialError::Rejected { status, message })
            }
            BrokerScript::TransientFailures { failures } => {
                if attempt <= failures {
                    Err(CredentialError::Network("connection reset".to_string()))
                } else {
                    Ok(credential_for(file_name))
                }
            }
        }
    }
}

#[derive(Clone)]
pub enum TransportScript {
    Ok { delay: Duration },
    Reject { status: u16 },
    TransientFailures { failures: u32 },
}

/// Scripted in-memory transport, keyed by the trailing write-URL segment.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, TransportScript>>,
    attempts: Mutex<HashMap<String, u32>>,
    written: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok_after(&self, file_name: &str, delay: Duration) {
        self.scripts
            .lock()
            .unwrap()
            .insert(file_name.to_string(), TransportScript::Ok { delay });
    }

    pub fn reject(&self, file_name: &str, status: u16) {
        self.scripts
            .lock()
            .unwrap()
            .insert(file_name.to_string(), TransportScript::Reject { status });
    }

    pub fn fail_transiently(&self, file_name: &str, failures: u32) {
        self.scripts.lock().unwrap().insert(
            file_name.to_string(),
            TransportScript::TransientFailures { failures },
        );
    }

    pub fn attempts(&self, file_name: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(file_name)
            .copied()
            .unwrap_or(0)
    }

    /// Write URLs that received a successful PUT.
    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn put_bytes(
        &self,
        write_url: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> Result<(), TransportError> {
        let file_name = write_url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(file_name.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&file_name)
            .cloned()
            .unwrap_or(TransportScript::Ok {
                delay: Duration::ZERO,
            });

        match script {
            TransportScript::Ok { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.written.lock().unwrap().push(write_url.to_string());
                Ok(())
            }
            TransportScript::Reject { status } => Err(TransportError::Rejected { status }),
            TransportScript::TransientFailures { failures } => {
                if attempt <= failures {
                    Err(TransportError::Timeout)
                } else {
                    self.written.lock().unwrap().push(write_url.to_string());
                    Ok(())
                }
            }
        }
    }
}

/// Records every sink invocation for assertions.
#[derive(Default)]
pub struct RecordingEvents {
    lists: Mutex<Vec<Vec<String>>>,
    thumbnails: Mutex<Vec<Option<String>>>,
    snapshots: Mutex<Vec<AssetSnapshot>>,
    rejections: Mutex<Vec<(String, RejectReason)>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> Vec<Vec<String>> {
        self.lists.lock().unwrap().clone()
    }

    pub fn latest_list(&self) -> Option<Vec<String>> {
        self.lists.lock().unwrap().last().cloned()
    }

    pub fn thumbnails(&self) -> Vec<Option<String>> {
        self.thumbnails.lock().unwrap().clone()
    }

    pub fn snapshots(&self) -> Vec<AssetSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn statuses(&self, file_name: &str) -> Vec<AssetStatus> {
        self.snapshots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.file_name == file_name)
            .map(|s| s.status)
            .collect()
    }

    pub fn terminal_snapshot(&self, file_name: &str) -> Option<AssetSnapshot> {
        self.snapshots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.file_name == file_name
                    && matches!(s.status, AssetStatus::Committed | AssetStatus::Failed)
            })
            .last()
            .cloned()
    }

    pub fn rejections(&self) -> Vec<(String, RejectReason)> {
        self.rejections.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.lists.lock().unwrap().len()
            + self.thumbnails.lock().unwrap().len()
            + self.snapshots.lock().unwrap().len()
            + self.rejections.lock().unwrap().len()
    }
}

impl UploadEvents for RecordingEvents {
    fn assets_changed(&self, assets: Vec<String>) {
        self.lists.lock().unwrap().push(assets);
    }

    fn thumbnail_changed(&self, url: Option<String>) {
        self.thumbnails.lock().unwrap().push(url);
    }

    fn asset_updated(&self, snapshot: AssetSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    fn asset_rejected(&self, file_name: &str, reason: RejectReason) {
        self.rejections
            .lock()
            .unwrap()
            .push((file_name.to_string(), reason));
    }
}
