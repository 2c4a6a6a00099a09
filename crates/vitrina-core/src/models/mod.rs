//! Domain models

pub mod asset;
pub mod candidate;
pub mod credential;

pub use asset::{Asset, AssetSnapshot, AssetState, AssetStatus};
pub use candidate::CandidateFile;
pub use credential::{CredentialRequest, CredentialResponse, UploadCredential};
