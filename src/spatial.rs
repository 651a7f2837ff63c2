//! Great-circle distance and brute-force neighbor search.
//!
//! Every distance in geonet is a haversine distance on a sphere of radius
//! [`EARTH_RADIUS_METERS`]. Merge decisions and query results depend on the
//! exact value, so all code paths go through [`haversine_distance`].

use geo::Point;
use geonet_types::point::SpotPoint;

/// Earth radius in meters for haversine distance calculations
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A query result: a stored point and its distance to the query target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Haversine distance in meters
    pub distance: f64,
    pub point: SpotPoint,
}

/// Calculate the haversine distance between two points.
///
/// Points use x = longitude and y = latitude, in degrees.
///
/// # Returns
///
/// Distance in meters.
///
/// # Examples
///
/// ```rust
/// use geonet::{Point, spatial::haversine_distance};
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// let la = Point::new(-118.2437, 34.0522);
///
/// let dist = haversine_distance(&la, &nyc);
/// assert!((dist - 3_935_746.25).abs() < 0.01);
/// ```
#[inline]
pub fn haversine_distance(point1: &Point, point2: &Point) -> f64 {
    let lat1_rad = point1.y().to_radians();
    let lat2_rad = point2.y().to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = point2.x().to_radians() - point1.x().to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal pairs
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Find the K nearest neighbors by scanning every candidate.
///
/// Linear in the number of candidates. The spatial index is the tool for
/// repeated queries; this is the reference the index is checked against.
///
/// # Arguments
///
/// * `center` - The query point
/// * `points` - Candidate spot points
/// * `k` - Number of nearest neighbors to return
///
/// # Returns
///
/// Up to `k` neighbors sorted by distance (nearest first). Equal distances
/// keep the candidates' input order.
///
/// # Examples
///
/// ```rust
/// use geonet::{NodeId, Point, SpotPoint, spatial::knn};
///
/// let center = Point::new(-74.0060, 40.7128);
/// let candidates = vec![
///     SpotPoint::from_lat_lon(40.6782, -73.9442, NodeId(0)), // Brooklyn
///     SpotPoint::from_lat_lon(34.0522, -118.2437, NodeId(1)), // LA
///     SpotPoint::from_lat_lon(40.7306, -73.9356, NodeId(2)), // Queens
/// ];
///
/// let nearest = knn(&center, &candidates, 2);
/// assert_eq!(nearest.len(), 2);
/// assert!(nearest.iter().all(|n| n.point.id != NodeId(1)));
/// ```
pub fn knn(center: &Point, points: &[SpotPoint], k: usize) -> Vec<Neighbor> {
    let mut distances: Vec<Neighbor> = points
        .iter()
        .map(|point| Neighbor {
            distance: haversine_distance(center, &point.point),
            point: *point,
        })
        .collect();

    // Stable sort keeps input order among ties
    distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    distances.truncate(k);
    distances
}
