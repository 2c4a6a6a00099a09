//! Storage transport: the raw byte write against an issued URL.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use vitrina_core::constants::DEFAULT_TRANSPORT_TIMEOUT_SECS;
use vitrina_core::error::TransportError;

use crate::build_http_client;

/// Writes file bytes to a credential's write URL.
///
/// No chunking or resumability: an interrupted write always requires a
/// brand-new session from the start.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn put_bytes(
        &self,
        write_url: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), TransportError>;
}

/// HTTP PUT implementation of [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TRANSPORT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len(), content_type = %content_type))]
    async fn put_bytes(
        &self,
        write_url: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .put(write_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "storage write rejected");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
