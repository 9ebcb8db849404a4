//! Registry configuration.
//!
//! Loaded from TOML at the wiring point; every key is optional:
//!
//! ```toml
//! mismatch_tolerance = 0.01
//! authoritative_prefix = "AUTHORITATIVE:"
//! ```

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Relative difference above which a numeric rewrite is logged as a mismatch.
pub const DEFAULT_MISMATCH_TOLERANCE: f64 = 0.01;

/// Source prefix marking a producer as authoritative.
pub const DEFAULT_AUTHORITATIVE_PREFIX: &str = "AUTHORITATIVE:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub mismatch_tolerance: f64,
    pub authoritative_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mismatch_tolerance: DEFAULT_MISMATCH_TOLERANCE,
            authoritative_prefix: DEFAULT_AUTHORITATIVE_PREFIX.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig =
            toml::from_str(text).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Builder-style override of the mismatch tolerance.
    pub fn with_mismatch_tolerance(mut self, tolerance: f64) -> Self {
        self.mismatch_tolerance = tolerance;
        self
    }

    pub fn with_authoritative_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.authoritative_prefix = prefix.into();
        self
    }

    pub fn validated(self) -> Result<Self, RegistryError> {
        if !self.mismatch_tolerance.is_finite() || self.mismatch_tolerance < 0.0 {
            return Err(RegistryError::Config(format!(
                "mismatch_tolerance must be a finite non-negative number, got {}",
                self.mismatch_tolerance
            )));
        }
        if self.authoritative_prefix.trim().is_empty() {
            return Err(RegistryError::Config(
                "authoritative_prefix must not be empty".to_string(),
            ));
        }
        Ok(self)
    }

    /// Whether `source` carries the authoritative marker.
    pub fn is_authoritative_source(&self, source: &str) -> bool {
        source.starts_with(&self.authoritative_prefix)
    }
}
