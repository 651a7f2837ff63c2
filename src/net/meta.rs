//! Per-spot and per-track bookkeeping kept next to the graph.

use crate::spatial_index::SpatialIndexStats;
use geo::Point;
use geonet_types::point::{NodeId, SpotPoint};
use geonet_types::record::{CentroidRecord, NodeRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visit counter and running centroid of one spot.
///
/// The spot itself never moves. The centroid is the mean of every raw sample
/// merged into the spot, including the one that created it. Longitudes are
/// averaged as offsets from the spot, so spots on the antimeridian get a
/// sensible mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotMeta {
    spot: SpotPoint,
    visits: u64,
    lat_offset_sum: f64,
    lon_offset_sum: f64,
}

impl SpotMeta {
    pub(crate) fn new(spot: SpotPoint) -> Self {
        Self::restored(spot, 1)
    }

    /// Metadata for a spot loaded from elsewhere; its centroid starts at the
    /// spot itself.
    pub(crate) fn restored(spot: SpotPoint, visits: u64) -> Self {
        Self {
            spot,
            visits,
            lat_offset_sum: 0.0,
            lon_offset_sum: 0.0,
        }
    }

    /// Seed the running sums so that `centroid()` reports `centroid`.
    pub(crate) fn with_centroid(mut self, centroid: &Point) -> Self {
        let n = self.visits as f64;
        self.lat_offset_sum = (centroid.y() - self.spot.latitude()) * n;
        self.lon_offset_sum = wrap_longitude(centroid.x() - self.spot.longitude()) * n;
        self
    }

    pub(crate) fn absorb(&mut self, sample: &Point) {
        self.visits += 1;
        self.lat_offset_sum += sample.y() - self.spot.latitude();
        self.lon_offset_sum += wrap_longitude(sample.x() - self.spot.longitude());
    }

    pub fn spot(&self) -> SpotPoint {
        self.spot
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn centroid(&self) -> Point {
        if self.visits == 0 {
            return self.spot.point;
        }
        let n = self.visits as f64;
        Point::new(
            wrap_longitude(self.spot.longitude() + self.lon_offset_sum / n),
            self.spot.latitude() + self.lat_offset_sum / n,
        )
    }

    pub fn record(&self) -> NodeRecord {
        NodeRecord::new(&self.spot, self.visits)
    }

    pub fn centroid_record(&self) -> CentroidRecord {
        CentroidRecord::new(self.spot.id, &self.centroid())
    }
}

/// Map a longitude or longitude difference into [-180, 180).
fn wrap_longitude(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// What one `add_track` call did to the net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub track_id: String,
    /// Raw samples consumed
    pub samples: usize,
    pub new_spots: usize,
    pub new_edges: usize,
    /// Different spots the track passed through
    pub distinct_spots: usize,
    /// Spot of the final sample, `None` for an empty track
    pub last_spot: Option<NodeId>,
}

/// Net-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetStats {
    pub spots: usize,
    pub edges: usize,
    pub tracks: usize,
    pub index: SpatialIndexStats,
}

impl fmt::Display for NetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "height of ball tree is: {}, spots: {}, edges: {}, tracks: {}, rebuilds: {}",
            self.index.height, self.spots, self.edges, self.tracks, self.index.rebuilds
        )
    }
}
