//! Engine options
//!
//! Options travel with a built [`MapperConfiguration`] and can be written in
//! YAML:
//!
//! ```yaml
//! max_depth: 32
//! duplicate_type_maps: reject
//! cache_plans: true
//! ```
//!
//! [`MapperConfiguration`]: crate::config::MapperConfiguration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Behaviour and limits of configuration building and mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperOptions {
    /// Deepest allowed recursion; `None` disables the guard
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,

    /// What `build()` does when a type pair is registered more than once
    #[serde(default)]
    pub duplicate_type_maps: DuplicateMapPolicy,

    /// Memoize resolved plans per type pair
    #[serde(default = "default_cache_plans")]
    pub cache_plans: bool,
}

fn default_max_depth() -> Option<usize> {
    Some(64)
}

fn default_cache_plans() -> bool {
    true
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            duplicate_type_maps: DuplicateMapPolicy::default(),
            cache_plans: default_cache_plans(),
        }
    }
}

/// Handling of repeated `create_map` calls for the same type pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMapPolicy {
    /// Keep every registration; lookups use the first one
    #[default]
    FirstWins,
    /// Fail the build
    Reject,
}

impl MapperOptions {
    /// Parse options from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let options = MapperOptions::load("./remap.yaml")?;
    /// let builder = MapperConfigurationBuilder::with_options(options);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded mapper options from {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Check option values
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(Error::ConfigInvalid {
                message: "max_depth must be at least 1 (use null to disable the limit)".to_string(),
            });
        }
        Ok(())
    }
}
