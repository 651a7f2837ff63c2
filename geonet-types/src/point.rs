use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a spot in the graph.
///
/// Ids come from a monotonic counter owned by the graph builder and are
/// never reused or renumbered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Raw numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> NodeId {
        NodeId(self.0 + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

/// A geographic point tagged with the id of the spot it represents.
///
/// # Examples
///
/// ```
/// use geonet_types::point::{NodeId, SpotPoint};
///
/// let berlin = SpotPoint::from_lat_lon(52.5200, 13.4050, NodeId(0));
/// assert_eq!(berlin.latitude(), 52.5200);
/// assert_eq!(berlin.longitude(), 13.4050);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotPoint {
    /// Position, x = longitude and y = latitude
    pub point: Point<f64>,
    pub id: NodeId,
}

impl SpotPoint {
    pub fn new(point: Point<f64>, id: NodeId) -> Self {
        Self { point, id }
    }

    /// Create a spot point from latitude/longitude order, as GPS data is
    /// usually written.
    pub fn from_lat_lon(latitude: f64, longitude: f64, id: NodeId) -> Self {
        Self {
            point: Point::new(longitude, latitude),
            id,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }
}
