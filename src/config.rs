//! Engine configuration.
//!
//! Registration-time settings for tail-recursive functions, loadable from a
//! TOML file and overridable from the environment.
//!
//! ## TOML Format
//!
//! ```toml
//! feature_set = "nested_calls"   # base | nested_calls | full
//! max_stack_depth = 100000       # optional bound on the explicit stack
//! ```
//!
//! ## Environment
//!
//! - `TAILREC_FEATURE_SET` overrides `feature_set`
//! - `TAILREC_MAX_STACK_DEPTH` overrides `max_stack_depth` (`none` clears it)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::backend::feature_set::{FeatureSet, ParseFeatureSetError};
use crate::backend::trampoline::Limits;

pub const FEATURE_SET_ENV: &str = "TAILREC_FEATURE_SET";
pub const MAX_STACK_DEPTH_ENV: &str = "TAILREC_MAX_STACK_DEPTH";

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{var}: {source}")]
    FeatureSet {
        var: &'static str,
        #[source]
        source: ParseFeatureSetError,
    },

    #[error("{var}: '{value}' is not a stack depth")]
    StackDepth { var: &'static str, value: String },
}

/// Settings applied when a function is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub feature_set: FeatureSet,

    #[serde(default)]
    pub max_stack_depth: Option<usize>,
}

impl EngineConfig {
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse_toml(&content)?;
        debug!(target: "tailrec::config", path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    /// Apply `TAILREC_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable source.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(FEATURE_SET_ENV) {
            self.feature_set = value.parse().map_err(|source| ConfigError::FeatureSet {
                var: FEATURE_SET_ENV,
                source,
            })?;
        }
        if let Some(value) = lookup(MAX_STACK_DEPTH_ENV) {
            let trimmed = value.trim();
            self.max_stack_depth = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(trimmed.parse().map_err(|_| ConfigError::StackDepth {
                    var: MAX_STACK_DEPTH_ENV,
                    value: value.clone(),
                })?)
            };
        }
        Ok(self)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_stack_depth: self.max_stack_depth,
        }
    }
}
