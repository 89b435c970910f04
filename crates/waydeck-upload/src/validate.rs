//! Upload checks.
//!
//! A rejected file is an ordinary outcome, reported through
//! [`FileRejection`] or [`ValidationOutcome`], never a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::policy::{FileDescriptor, ValidationPolicy, ALLOWED_DOCUMENT_TYPES};

/// Why a file was refused. Exactly one reason is reported per file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FileRejection {
    #[error("Invalid file type. Allowed types: {}", .allowed_subtypes.join(", "))]
    InvalidType {
        mime_type: String,
        allowed_subtypes: Vec<String>,
    },

    #[error("File too large. Maximum size: {max_size_mb}MB")]
    TooLarge { size_bytes: u64, max_size_mb: f64 },
}

/// Whether `mime_type` is one of the default document types.
///
/// Matching is exact: `application/pdf; charset=binary` and `Image/PNG`
/// are both refused.
#[must_use]
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_DOCUMENT_TYPES.contains(&mime_type)
}

/// Whether `size_bytes` fits within `max_size_mb` MiB. The limit itself fits.
#[must_use]
pub fn is_file_size_valid(size_bytes: u64, max_size_mb: f64) -> bool {
    size_bytes as f64 <= max_size_mb * 1024.0 * 1024.0
}

/// Check `file` against `policy`, type first.
///
/// # Errors
///
/// Returns the first [`FileRejection`] that applies.
pub fn check_file(file: &FileDescriptor, policy: &ValidationPolicy) -> Result<(), FileRejection> {
    if !policy.allows(&file.mime_type) {
        debug!(mime_type = %file.mime_type, "upload rejected: type not allowed");
        return Err(FileRejection::InvalidType {
            mime_type: file.mime_type.clone(),
            allowed_subtypes: policy.allowed_subtypes(),
        });
    }

    if !is_file_size_valid(file.size_bytes, policy.max_size_mb) {
        debug!(
            size_bytes = file.size_bytes,
            max_size_mb = policy.max_size_mb,
            "upload rejected: too large"
        );
        return Err(FileRejection::TooLarge {
            size_bytes: file.size_bytes,
            max_size_mb: policy.max_size_mb,
        });
    }

    Ok(())
}

/// Display-layer result of validating one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), FileRejection>> for ValidationOutcome {
    fn from(result: Result<(), FileRejection>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(rejection) => Self {
                valid: false,
                error: Some(rejection.to_string()),
            },
        }
    }
}

/// Validate `file` against `policy`, or the document defaults when `None`.
#[must_use]
pub fn validate_file(file: &FileDescriptor, policy: Option<&ValidationPolicy>) -> ValidationOutcome {
    match policy {
        Some(policy) => check_file(file, policy).into(),
        None => check_file(file, &ValidationPolicy::default()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MIB: u64 = 1024 * 1024;

    // === MIME types ===

    #[test]
    fn allows_document_types() {
        for mime in ALLOWED_DOCUMENT_TYPES {
            assert!(is_allowed_mime_type(mime), "{mime}");
        }
    }

    #[test]
    fn refuses_other_types() {
        for mime in [
            "application/javascript",
            "text/html",
            "application/octet-stream",
            "image/gif",
            "video/mp4",
        ] {
            assert!(!is_allowed_mime_type(mime), "{mime}");
        }
    }

    #[test]
    fn mime_match_is_exact() {
        assert!(!is_allowed_mime_type("application/pdf;charset=binary"));
        assert!(!is_allowed_mime_type("IMAGE/PNG"));
        assert!(!is_allowed_mime_type(" image/png"));
        assert!(!is_allowed_mime_type(""));
    }

    #[test]
    fn allowlist_agrees_with_default_policy() {
        let policy = ValidationPolicy::default();
        for mime in ["application/pdf", "image/webp", "image/gif", "text/plain"] {
            assert_eq!(is_allowed_mime_type(mime), policy.allows(mime), "{mime}");
        }
    }

    // === Sizes ===

    #[test]
    fn size_limits() {
        assert!(is_file_size_valid(5 * MIB, 10.0));
        assert!(is_file_size_valid(10 * MIB, 10.0));
        assert!(!is_file_size_valid(11 * MIB, 10.0));
        assert!(!is_file_size_valid(10 * MIB + 1, 10.0));
        assert!(is_file_size_valid(0, 10.0));
    }

    // === Whole-file validation ===

    #[test]
    fn accepts_allowed_small_files() {
        for mime in ALLOWED_DOCUMENT_TYPES {
            let outcome = validate_file(&FileDescriptor::new(mime, 1024), None);
            assert!(outcome.valid, "{mime}");
            assert_eq!(outcome.error, None);
        }
    }

    #[test]
    fn rejects_disallowed_type() {
        let outcome = validate_file(&FileDescriptor::new("application/javascript", 1024), None);
        assert!(!outcome.valid);
        let error = outcome.error.unwrap();
        assert!(error.contains("Invalid file type"));
        assert!(error.contains("pdf, jpeg, png, webp"));
    }

    #[test]
    fn rejects_oversized_file() {
        let outcome = validate_file(&FileDescriptor::new("application/pdf", 15 * MIB), None);
        assert!(!outcome.valid);
        let error = outcome.error.unwrap();
        assert!(error.contains("File too large"));
        assert!(error.contains("Maximum size: 10MB"));
    }

    #[test]
    fn respects_custom_size_limit() {
        let policy = ValidationPolicy::default().with_max_size_mb(2.0);
        let outcome = validate_file(&FileDescriptor::new("application/pdf", 3 * MIB), Some(&policy));
        assert!(!outcome.valid);
        assert!(outcome.error.unwrap().contains("Maximum size: 2MB"));
    }

    #[test]
    fn type_check_runs_before_size_check() {
        let err = check_file(
            &FileDescriptor::new("video/mp4", 500 * MIB),
            &ValidationPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FileRejection::InvalidType { .. }));
    }

    #[test]
    fn fractional_limits_render_as_written() {
        let policy = ValidationPolicy::default().with_max_size_mb(2.5);
        let err = check_file(&FileDescriptor::new("image/png", 3 * MIB), &policy).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size: 2.5MB");
    }

    #[test]
    fn outcome_serializes_without_error_when_valid() {
        let json = serde_json::to_string(&validate_file(&FileDescriptor::new("image/png", 1), None))
            .unwrap();
        assert_eq!(json, r#"{"valid":true}"#);
    }

    proptest! {
        #[test]
        fn size_check_agrees_with_byte_limit(size in 0u64..64 * MIB, limit in 0u64..32) {
            let expected = size <= limit * MIB;
            prop_assert_eq!(is_file_size_valid(size, limit as f64), expected);
        }

        #[test]
        fn unknown_types_never_pass(sub in "[a-z]{1,12}") {
            let mime = format!("x-unknown/{sub}");
            let outcome = validate_file(&FileDescriptor::new(mime, 0), None);
            prop_assert!(!outcome.valid);
        }
    }
}
