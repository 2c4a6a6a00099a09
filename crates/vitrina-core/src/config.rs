//! Configuration module
//!
//! Upload constraints and orchestrator configuration, with defaults for the
//! three product surfaces: gallery images, the single cover thumbnail, and
//! downloadable product files.

use std::time::Duration;

use anyhow::Result;

use crate::constants::{
    DEFAULT_FAILURE_DISPLAY_DELAY_SECS, DEFAULT_GALLERY_MAX_COUNT, DEFAULT_IMAGE_MAX_SIZE_BYTES,
    DEFAULT_IMAGE_MIME_PREFIXES, DEFAULT_PRODUCT_FILE_EXTENSIONS,
    DEFAULT_PRODUCT_FILE_MAX_SIZE_BYTES,
};
use crate::retry::RetryPolicy;

/// How candidate files are matched against the allowlist.
///
/// Image surfaces match on MIME prefix; the product-file surface matches on
/// file extension because download archives arrive with opaque content types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Content type must start with one of these prefixes.
    MimePrefixes(Vec<String>),
    /// File name must end in one of these extensions (without leading dot,
    /// matched case-insensitively).
    Extensions(Vec<String>),
}

/// Size and type constraints applied before a session is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConstraints {
    pub max_size_bytes: u64,
    pub kind: ConstraintKind,
}

impl UploadConstraints {
    /// Defaults for gallery and thumbnail images: 2 MiB, common image types.
    pub fn gallery_images() -> Self {
        Self {
            max_size_bytes: DEFAULT_IMAGE_MAX_SIZE_BYTES,
            kind: ConstraintKind::MimePrefixes(
                DEFAULT_IMAGE_MIME_PREFIXES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }

    /// Defaults for downloadable product files: 100 MiB, archive/document
    /// extensions.
    pub fn product_files() -> Self {
        Self {
            max_size_bytes: DEFAULT_PRODUCT_FILE_MAX_SIZE_BYTES,
            kind: ConstraintKind::Extensions(
                DEFAULT_PRODUCT_FILE_EXTENSIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }
}

/// Orchestrator configuration.
///
/// `max_count == 1` selects the single-slot variant: a newly committed asset
/// supersedes the existing one instead of appending, and changes are reported
/// through `thumbnail_changed` rather than `assets_changed`.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Total capacity: committed assets plus in-flight sessions.
    pub max_count: usize,
    pub constraints: UploadConstraints,
    /// How long a failed asset keeps its preview before cleanup.
    pub failure_display_delay: Duration,
    pub retry: RetryPolicy,
}

impl UploaderConfig {
    /// Multi-image gallery: 5 slots, image constraints.
    pub fn gallery() -> Self {
        Self {
            max_count: DEFAULT_GALLERY_MAX_COUNT,
            constraints: UploadConstraints::gallery_images(),
            failure_display_delay: Duration::from_secs(DEFAULT_FAILURE_DISPLAY_DELAY_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Single cover thumbnail: one slot, image constraints.
    pub fn thumbnail() -> Self {
        Self {
            max_count: 1,
            ..Self::gallery()
        }
    }

    /// Single downloadable product file: one slot, extension allowlist with
    /// the larger size ceiling.
    pub fn product_files() -> Self {
        Self {
            max_count: 1,
            constraints: UploadConstraints::product_files(),
            ..Self::gallery()
        }
    }

    /// Validate critical configuration values.
    ///
    /// Fails fast on values that would make the orchestrator inert or admit
    /// everything, the same class of misconfiguration the backend catches at
    /// startup.
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(anyhow::anyhow!("max_count cannot be 0"));
        }

        if self.constraints.max_size_bytes == 0 {
            return Err(anyhow::anyhow!("max_size_bytes cannot be 0"));
        }

        match &self.constraints.kind {
            ConstraintKind::MimePrefixes(prefixes) if prefixes.is_empty() => {
                Err(anyhow::anyhow!("MIME prefix allowlist cannot be empty"))
            }
            ConstraintKind::Extensions(extensions) if extensions.is_empty() => {
                Err(anyhow::anyhow!("extension allowlist cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_defaults() {
        let config = UploaderConfig::gallery();
        assert_eq!(config.max_count, 5);
        assert_eq!(config.constraints.max_size_bytes, 2 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn thumbnail_is_single_slot() {
        let config = UploaderConfig::thumbnail();
        assert_eq!(config.max_count, 1);
        assert_eq!(config.constraints, UploadConstraints::gallery_images());
    }

    #[test]
    fn product_files_use_extension_allowlist() {
        let config = UploaderConfig::product_files();
        assert_eq!(config.max_count, 1);
        assert_eq!(config.constraints.max_size_bytes, 100 * 1024 * 1024);
        assert!(matches!(
            config.constraints.kind,
            ConstraintKind::Extensions(_)
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = UploaderConfig::gallery();
        config.max_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_allowlist_is_rejected() {
        let mut config = UploaderConfig::gallery();
        config.constraints.kind = ConstraintKind::MimePrefixes(Vec::new());
        assert!(config.validate().is_err());
    }
}
