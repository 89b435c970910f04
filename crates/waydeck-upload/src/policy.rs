//! Upload policies: which declared types are accepted, and how large a file may be.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// MIME types accepted for trip documents, in display order.
pub const ALLOWED_DOCUMENT_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/png", "image/webp"];

/// MIME types accepted for profile avatars.
pub const ALLOWED_AVATAR_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Default document size limit, in MiB.
pub const MAX_DOCUMENT_SIZE_MB: f64 = 10.0;

/// Avatar size limit, in MiB.
pub const MAX_AVATAR_SIZE_MB: f64 = 5.0;

/// Constraints applied to a single upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: f64,
}

fn default_allowed_types() -> Vec<String> {
    ALLOWED_DOCUMENT_TYPES.iter().map(|t| (*t).to_string()).collect()
}

fn default_max_size_mb() -> f64 {
    MAX_DOCUMENT_SIZE_MB
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allowed_types: default_allowed_types(),
            max_size_mb: default_max_size_mb(),
        }
    }
}

impl ValidationPolicy {
    /// Policy for profile avatars: images only, 5 MiB.
    #[must_use]
    pub fn avatar() -> Self {
        Self {
            allowed_types: ALLOWED_AVATAR_TYPES.iter().map(|t| (*t).to_string()).collect(),
            max_size_mb: MAX_AVATAR_SIZE_MB,
        }
    }

    #[must_use]
    pub fn with_max_size_mb(mut self, max_size_mb: f64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    #[must_use]
    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Exact, case-sensitive membership test.
    #[must_use]
    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }

    /// Size limit in bytes.
    #[must_use]
    pub fn max_size_bytes(&self) -> f64 {
        self.max_size_mb * 1024.0 * 1024.0
    }

    /// The part after `/` of each allowed type, for user-facing messages.
    #[must_use]
    pub fn allowed_subtypes(&self) -> Vec<String> {
        self.allowed_types
            .iter()
            .map(|t| t.split_once('/').map_or(t.as_str(), |(_, sub)| sub).to_string())
            .collect()
    }
}

/// What the client claims about an uploaded file. Both fields are
/// untrusted; nothing here inspects file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileDescriptor {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Describe a file on disk: size from metadata, type guessed from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file's metadata cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::new(mime_type_for_path(path), metadata.len()))
    }
}

/// Guess a declared MIME type from a path's extension, falling back to
/// `application/octet-stream`.
#[must_use]
pub fn mime_type_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
