//! Upload credential wire types.
//!
//! One credential per asset: single-use, short TTL, issued by the backend in
//! exchange for file metadata and consumed by exactly one storage write.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to issue a write credential for one file.
#[derive(Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Content type (MIME type)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
}

/// Response containing the one-time write URL and upload information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    /// One-time URL the file bytes are written to
    pub upload_url: String,
    /// Storage key the object will live under
    pub file_key: String,
    /// Public URL the object is reachable at once written
    pub public_url: String,
}

/// Time-limited write authorization for one direct storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCredential {
    pub write_url: String,
    pub storage_key: String,
    pub public_url: String,
}

impl From<CredentialResponse> for UploadCredential {
    fn from(response: CredentialResponse) -> Self {
        Self {
            write_url: response.upload_url,
            storage_key: response.file_key,
            public_url: response.public_url,
        }
    }
}
