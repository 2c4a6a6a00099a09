//! Credential broker: exchanges file metadata for a one-time write URL.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use validator::Validate;

use vitrina_core::constants::DEFAULT_BROKER_TIMEOUT_SECS;
use vitrina_core::error::CredentialError;
use vitrina_core::models::{CredentialRequest, CredentialResponse, UploadCredential};

use crate::{api_prefix, build_http_client, Auth};

/// Issues one single-use write credential per asset.
///
/// No batching and no built-in resubmission: a user-visible retry is a fresh
/// session with a fresh credential. Transient network failures may still be
/// retried by the session's retry policy.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    async fn request_credential(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadCredential, CredentialError>;
}

/// HTTP implementation of [`CredentialBroker`] against the Vitrina backend.
#[derive(Clone, Debug)]
pub struct HttpCredentialBroker {
    client: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl HttpCredentialBroker {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        Self::with_timeout(base_url, auth, Duration::from_secs(DEFAULT_BROKER_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create a broker from environment: VITRINA_API_URL (or API_URL),
    /// VITRINA_API_KEY (or API_KEY). Uses X-API-Key auth.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("VITRINA_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let api_key = std::env::var("VITRINA_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .context("Missing API key. Set VITRINA_API_KEY or API_KEY")?;

        Self::new(base_url, Auth::XApiKey(api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials_url(&self) -> String {
        format!("{}{}/uploads/credentials", self.base_url, api_prefix())
    }
}

#[async_trait]
impl CredentialBroker for HttpCredentialBroker {
    #[tracing::instrument(skip(self), fields(file_name = %file_name, content_type = %content_type))]
    async fn request_credential(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadCredential, CredentialError> {
        let request = CredentialRequest {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        };
        request
            .validate()
            .map_err(|e| CredentialError::InvalidRequest(e.to_string()))?;

        let response = self
            .auth
            .apply(self.client.post(self.credentials_url()).json(&request))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(status = status.as_u16(), "credential request rejected");
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: CredentialResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::InvalidResponse(e.to_string()))?;

        Ok(body.into())
    }
}

fn map_send_error(err: reqwest::Error) -> CredentialError {
    if err.is_timeout() {
        CredentialError::Timeout
    } else {
        CredentialError::Network(err.to_string())
    }
}
