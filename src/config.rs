//! Graph builder configuration.
//!
//! All settings are fixed when a net is created. The struct is serializable
//! so hosts can keep it next to their own settings in JSON or TOML.

use crate::error::{GeonetError, Result};
use crate::spatial_index::PruningMode;
use serde::{Deserialize, Serialize};

/// Net configuration
///
/// # Example
///
/// ```rust
/// use geonet::{Config, PruningMode};
///
/// let config = Config::default();
/// assert_eq!(config.max_spot_distance, 75.0);
///
/// let json = r#"{
///     "max_spot_distance": 50.0,
///     "imbalance_tolerance": 1,
///     "pruning": "subtree_radius"
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.pruning, PruningMode::SubtreeRadius);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Raw points closer than this many meters to an existing spot merge into it
    #[serde(default = "Config::default_max_spot_distance")]
    pub max_spot_distance: f64,

    /// Largest allowed height difference between sibling subtrees of the index
    #[serde(default = "Config::default_imbalance_tolerance")]
    pub imbalance_tolerance: usize,

    #[serde(default)]
    pub pruning: PruningMode,
}

impl Config {
    const fn default_max_spot_distance() -> f64 {
        75.0
    }

    const fn default_imbalance_tolerance() -> usize {
        150
    }

    /// Default settings with a tolerance of 1, which keeps the index close to
    /// perfectly balanced at the price of frequent rebuilds.
    pub fn strict() -> Self {
        Self::default().with_imbalance_tolerance(1)
    }

    pub fn with_max_spot_distance(mut self, meters: f64) -> Self {
        self.max_spot_distance = meters;
        self
    }

    pub fn with_imbalance_tolerance(mut self, tolerance: usize) -> Self {
        self.imbalance_tolerance = tolerance;
        self
    }

    pub fn with_pruning(mut self, pruning: PruningMode) -> Self {
        self.pruning = pruning;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.max_spot_distance.is_finite() {
            return Err(GeonetError::InvalidConfig(format!(
                "max_spot_distance must be finite, got: {}",
                self.max_spot_distance
            )));
        }

        if self.max_spot_distance < 0.0 {
            return Err(GeonetError::InvalidConfig(format!(
                "max_spot_distance must not be negative, got: {}",
                self.max_spot_distance
            )));
        }

        if self.imbalance_tolerance == 0 {
            return Err(GeonetError::InvalidConfig(
                "imbalance_tolerance must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a TOML configuration.
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_spot_distance: Self::default_max_spot_distance(),
            imbalance_tolerance: Self::default_imbalance_tolerance(),
            pruning: PruningMode::default(),
        }
    }
}
