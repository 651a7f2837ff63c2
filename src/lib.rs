//! Deduplicated spot/edge graphs from raw GPS tracks.
//!
//! Samples closer than a configurable distance to an existing spot are merged
//! into it; consecutive samples of a track that land on different spots are
//! joined by an edge. Nearest-spot lookups go through a latitude-partitioned
//! ball tree with lazy subtree rebuilds.
//!
//! ```rust
//! use geonet::{Net, Point};
//!
//! let mut net = Net::new();
//! net.add_track(
//!     "morning-run",
//!     vec![
//!         Point::new(-74.0060, 40.7128),
//!         Point::new(-74.0059, 40.7128),
//!         Point::new(-74.0010, 40.7150),
//!     ],
//! );
//!
//! assert_eq!(net.points().len(), 2);
//! assert_eq!(net.edges().len(), 1);
//! let json = net.snapshot().to_json()?;
//! # let _ = json;
//! # Ok::<(), geonet::GeonetError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod net;
pub mod spatial;
pub mod spatial_index;

pub use builder::NetBuilder;
pub use config::Config;
pub use error::{GeonetError, Result};
pub use net::{Net, NetSnapshot, NetStats, SpotMeta, TrackSummary};

/// The graph builder under its descriptive name.
pub type GraphBuilder = Net;

pub use geo::Point;

pub use spatial::{EARTH_RADIUS_METERS, Neighbor, haversine_distance, knn};

pub use spatial_index::{PruningMode, SpatialIndex, SpatialIndexStats};

pub use geonet_types::edge::EdgeKey;
pub use geonet_types::point::{NodeId, SpotPoint};
pub use geonet_types::record::{CentroidRecord, EdgeRecord, NodeRecord};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeonetError, GraphBuilder, Net, NetBuilder, Result};

    pub use geo::Point;

    pub use crate::spatial::{haversine_distance, knn};

    pub use crate::{Config, PruningMode};

    pub use crate::{EdgeRecord, NodeId, NodeRecord, SpotPoint};
}
