//! Candidate file validation
//!
//! Pure, synchronous admission check. Runs before any asset or session is
//! created; a rejected file never touches the network.

use crate::config::{ConstraintKind, UploadConstraints};
use crate::error::ValidationError;
use crate::models::CandidateFile;

/// Check a candidate file against size and type constraints.
pub fn validate(file: &CandidateFile, constraints: &UploadConstraints) -> Result<(), ValidationError> {
    let size_bytes = file.size();
    if size_bytes > constraints.max_size_bytes {
        return Err(ValidationError::TooLarge {
            size_bytes,
            max_size_bytes: constraints.max_size_bytes,
        });
    }

    match &constraints.kind {
        ConstraintKind::MimePrefixes(prefixes) => {
            if !prefixes
                .iter()
                .any(|prefix| file.content_type.starts_with(prefix.as_str()))
            {
                return Err(ValidationError::UnsupportedType {
                    detail: format!("content type {} is not allowed", file.content_type),
                });
            }
        }
        ConstraintKind::Extensions(extensions) => {
            let ext = file.extension().unwrap_or_default().to_lowercase();
            if !extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)) {
                return Err(ValidationError::UnsupportedType {
                    detail: format!("extension .{} is not allowed", ext),
                });
            }
        }
    }

    Ok(())
}
