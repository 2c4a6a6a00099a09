//! Error types module
//!
//! Upload failures fall into three families: validation (pre-network, no
//! session created), credential (the backend refused to issue write access),
//! and transport (the direct storage write failed). The umbrella
//! [`UploadError`] is what a session records when it reaches `Failed`.

/// Rejection produced by the pure validator before any session exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file too large: {size_bytes} bytes exceeds the {max_size_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_size_bytes: u64 },

    #[error("unsupported file type: {detail}")]
    UnsupportedType { detail: String },
}

/// The backend refused or failed to issue an upload credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("credential request timed out")]
    Timeout,

    #[error("credential request failed: {0}")]
    Network(String),

    #[error("invalid credential request: {0}")]
    InvalidRequest(String),

    #[error("invalid credential response: {0}")]
    InvalidResponse(String),
}

impl CredentialError {
    /// Whether a retry could plausibly succeed. Backend rejections (4xx) are
    /// permanent; timeouts, network trouble, and 5xx are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            CredentialError::Rejected { status, .. } => *status >= 500,
            CredentialError::Timeout | CredentialError::Network(_) => true,
            CredentialError::InvalidRequest(_) | CredentialError::InvalidResponse(_) => false,
        }
    }
}

/// The direct write to the issued URL failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("storage write rejected with status {status}")]
    Rejected { status: u16 },

    #[error("storage write timed out")]
    Timeout,

    #[error("storage write failed: {0}")]
    Network(String),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Rejected { status } => *status >= 500,
            TransportError::Timeout | TransportError::Network(_) => true,
        }
    }
}

/// Terminal failure recorded on an asset. Credential and transport failures
/// present identically to the host ("upload failed" plus a message); the
/// distinction only matters to the retry policy.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_rejection_is_permanent_below_500() {
        let err = CredentialError::Rejected {
            status: 403,
            message: "quota exceeded".to_string(),
        };
        assert!(!err.is_transient());

        let err = CredentialError::Rejected {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn transport_timeouts_are_transient() {
        assert!(TransportError::Timeout.is_transient());
        assert!(TransportError::Network("connection reset".to_string()).is_transient());
        assert!(!TransportError::Rejected { status: 403 }.is_transient());
    }

    #[test]
    fn upload_error_message_passes_through() {
        let err = UploadError::from(TransportError::Rejected { status: 500 });
        assert_eq!(err.to_string(), "storage write rejected with status 500");
    }
}
