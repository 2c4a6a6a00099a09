//! Vitrina Core Library
//!
//! This crate provides the domain models, error types, upload constraints,
//! and validation shared across all Vitrina components. It has no network
//! dependencies; the HTTP broker and transport live in `vitrina-client`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod retry;
pub mod validation;

// Re-export commonly used types
pub use config::{ConstraintKind, UploadConstraints, UploaderConfig};
pub use error::{CredentialError, TransportError, UploadError, ValidationError};
pub use models::{Asset, AssetSnapshot, AssetState, AssetStatus, CandidateFile, UploadCredential};
pub use retry::RetryPolicy;
pub use validation::validate;
