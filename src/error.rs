//! Error types for geonet.
//!
//! The graph core itself does not fail on numeric input; errors come from the
//! boundary helpers: configuration loading, coordinate validation and snapshot
//! restore.

use geonet_types::point::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeonetError {
    /// Coordinates rejected by boundary validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration values out of their allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node id the net never issued.
    #[error("Unknown node id: {0}")]
    UnknownNode(NodeId),

    /// A snapshot that cannot be turned back into a consistent net.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for geonet operations.
pub type Result<T> = std::result::Result<T, GeonetError>;
