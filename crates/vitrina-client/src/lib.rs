//! HTTP client layer for Vitrina uploads.
//!
//! Provides the [`CredentialBroker`] and [`Transport`] trait seams together
//! with their `reqwest` implementations: a JSON credential exchange against
//! the backend, and a raw PUT of the file bytes against the issued write URL.
//! Both carry explicit request timeouts.

pub mod broker;
pub mod transport;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

/// Authentication strategy for the credential backend.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

impl Auth {
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }
}

/// API version prefix (e.g. "/api/v0"). Set VITRINA_API_VERSION to match the
/// backend.
pub fn api_prefix() -> String {
    let version = std::env::var("VITRINA_API_VERSION").unwrap_or_else(|_| "v0".to_string());
    format!("/api/{}", version)
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

pub use broker::{CredentialBroker, HttpCredentialBroker};
pub use transport::{HttpTransport, Transport};
