//! Candidate files: what the host hands the orchestrator on selection/drop.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

use crate::constants::OCTET_STREAM;

/// One file selected or dropped by the user, fully read into memory.
///
/// Transfers are not chunked or resumable, so the whole payload travels as a
/// single `Bytes` value that sessions clone cheaply.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Original file name, including extension.
    pub file_name: String,
    /// MIME type as reported by the picker, or guessed from the extension.
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Extension without the leading dot, if the name carries one.
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }

    /// Read a file from disk, guessing the content type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("File path has no usable file name")?
            .to_string();

        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(content_type_for_extension)
            .unwrap_or(OCTET_STREAM);

        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            data: Bytes::from(data),
        })
    }
}

/// Best-effort content type from a file extension. Unknown extensions map to
/// the generic octet-stream type, which is also what product files use on the
/// wire.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}
