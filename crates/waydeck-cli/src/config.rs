//! Optional TOML configuration for upload limits.
//!
//! ```toml
//! [upload]
//! allowed_types = ["application/pdf", "image/png"]
//! max_size_mb = 20
//!
//! [avatar]
//! max_size_mb = 2
//! ```
//!
//! Every key is optional; omitted keys keep the built-in defaults of the
//! section's base policy.

use std::path::Path;

use serde::Deserialize;
use waydeck_core::{Result, WaydeckError};
use waydeck_upload::ValidationPolicy;

/// Overrides for one upload policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    pub allowed_types: Option<Vec<String>>,
    pub max_size_mb: Option<f64>,
}

impl PolicySection {
    pub fn apply(&self, mut base: ValidationPolicy) -> ValidationPolicy {
        if let Some(types) = &self.allowed_types {
            base.allowed_types.clone_from(types);
        }
        if let Some(max) = self.max_size_mb {
            base.max_size_mb = max;
        }
        base
    }

    fn check(&self, section: &str) -> Result<()> {
        if let Some(max) = self.max_size_mb {
            check_max_size_mb(&format!("[{section}] max_size_mb"), max)?;
        }
        if self.allowed_types.as_ref().is_some_and(Vec::is_empty) {
            return Err(WaydeckError::Config(format!(
                "[{section}] allowed_types must not be empty"
            )));
        }
        Ok(())
    }
}

/// Size limits must be finite and non-negative, wherever they come from.
///
/// # Errors
///
/// Returns [`WaydeckError::Config`] naming `setting` otherwise.
pub fn check_max_size_mb(setting: &str, max: f64) -> Result<()> {
    if max.is_finite() && max >= 0.0 {
        Ok(())
    } else {
        Err(WaydeckError::Config(format!(
            "{setting} must be a non-negative number, got {max}"
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub upload: PolicySection,
    pub avatar: PolicySection,
}

impl Config {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`WaydeckError::Io`] if the file cannot be read and
    /// [`WaydeckError::Config`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// # Errors
    ///
    /// Returns [`WaydeckError::Config`] on malformed TOML, unknown keys or
    /// out-of-range values.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| WaydeckError::Config(e.to_string()))?;
        config.upload.check("upload")?;
        config.avatar.check("avatar")?;
        Ok(config)
    }

    pub fn document_policy(&self) -> ValidationPolicy {
        self.upload.apply(ValidationPolicy::default())
    }

    pub fn avatar_policy(&self) -> ValidationPolicy {
        self.avatar.apply(ValidationPolicy::avatar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.document_policy(), ValidationPolicy::default());
        assert_eq!(config.avatar_policy(), ValidationPolicy::avatar());
    }

    #[test]
    fn sections_override_only_given_keys() {
        let config = Config::parse(
            "[upload]\nmax_size_mb = 20\n\n[avatar]\nallowed_types = [\"image/png\"]\n",
        )
        .unwrap();

        let docs = config.document_policy();
        assert!((docs.max_size_mb - 20.0).abs() < f64::EPSILON);
        assert_eq!(docs.allowed_types, ValidationPolicy::default().allowed_types);

        let avatar = config.avatar_policy();
        assert_eq!(avatar.allowed_types, ["image/png"]);
        assert!((avatar.max_size_mb - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::parse("[upload]\nmax_size = 3\n").unwrap_err();
        assert!(matches!(err, WaydeckError::Config(_)));
    }

    #[test]
    fn rejects_negative_limits_and_empty_type_lists() {
        assert!(Config::parse("[upload]\nmax_size_mb = -1\n").is_err());
        assert!(Config::parse("[avatar]\nallowed_types = []\n").is_err());
    }

    #[test]
    fn size_limits_must_be_finite_and_non_negative() {
        assert!(check_max_size_mb("--max-size-mb", 0.0).is_ok());
        assert!(check_max_size_mb("--max-size-mb", 2.5).is_ok());
        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let err = check_max_size_mb("--max-size-mb", bad).unwrap_err();
            assert!(err.to_string().contains("--max-size-mb"), "{err}");
        }
        assert!(Config::parse("[upload]\nmax_size_mb = nan\n").is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, WaydeckError::Io(_)));
    }
}
