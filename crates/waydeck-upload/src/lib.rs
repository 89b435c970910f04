//! # waydeck-upload
//!
//! Checks applied to documents and avatars before they are handed to
//! storage, plus display helpers for file sizes.
//!
//! - [`ValidationPolicy`] — allowed types and size limit, configurable per call
//! - [`check_file`] / [`validate_file`] — type check, then size check
//! - [`format_file_size`] — `B` / `KB` / `MB` in 1024-based units

pub mod policy;
pub mod size;
pub mod validate;

pub use policy::{
    mime_type_for_path, FileDescriptor, ValidationPolicy, ALLOWED_AVATAR_TYPES,
    ALLOWED_DOCUMENT_TYPES, MAX_AVATAR_SIZE_MB, MAX_DOCUMENT_SIZE_MB,
};
pub use size::format_file_size;
pub use validate::{
    check_file, is_allowed_mime_type, is_file_size_valid, validate_file, FileRejection,
    ValidationOutcome,
};
