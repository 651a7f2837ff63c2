//! Net builder for configuration and seeding
//!
//! `NetBuilder` collects settings and an optional set of existing spots, then
//! assembles the net with a single bulk index build instead of one insert per
//! spot.

use crate::config::Config;
use crate::error::Result;
use crate::net::{Net, SpotMeta};
use crate::spatial_index::PruningMode;
use geo::Point;
use geonet_types::point::{NodeId, SpotPoint};

/// Builder for a [`Net`] with custom settings and seed spots.
///
/// ```rust
/// use geonet::{NetBuilder, Point, PruningMode};
///
/// let net = NetBuilder::new()
///     .max_spot_distance(30.0)
///     .pruning(PruningMode::SubtreeRadius)
///     .seed_points(vec![Point::new(2.3522, 48.8566), Point::new(4.8357, 45.7640)])
///     .build()
///     .unwrap();
///
/// assert_eq!(net.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetBuilder {
    config: Config,
    seeds: Vec<Point>,
}

impl NetBuilder {
    /// Create a builder with the default configuration and no seeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn max_spot_distance(mut self, meters: f64) -> Self {
        self.config = self.config.with_max_spot_distance(meters);
        self
    }

    pub fn imbalance_tolerance(mut self, tolerance: usize) -> Self {
        self.config = self.config.with_imbalance_tolerance(tolerance);
        self
    }

    pub fn pruning(mut self, pruning: PruningMode) -> Self {
        self.config = self.config.with_pruning(pruning);
        self
    }

    /// Add existing positions that become spots as they are, without merging.
    ///
    /// Ids are assigned from 0 in input order, across repeated calls.
    pub fn seed_points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        self.seeds.extend(points);
        self
    }

    /// Validate the configuration and assemble the net.
    pub fn build(self) -> Result<Net> {
        let spots = self
            .seeds
            .into_iter()
            .enumerate()
            .map(|(idx, point)| SpotMeta::new(SpotPoint::new(point, NodeId(idx as u64))))
            .collect();

        Net::from_parts(self.config, spots, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeonetError;

    #[test]
    fn test_builder_default() {
        let net = NetBuilder::new().build().unwrap();
        assert!(net.is_empty());
        assert_eq!(net.config(), &Config::default());
    }

    #[test]
    fn test_builder_settings() {
        let net = Net::builder()
            .max_spot_distance(12.5)
            .imbalance_tolerance(4)
            .pruning(PruningMode::SubtreeRadius)
            .build()
            .unwrap();

        assert_eq!(net.config().max_spot_distance, 12.5);
        assert_eq!(net.index().imbalance_tolerance(), 4);
        assert_eq!(net.index().pruning(), PruningMode::SubtreeRadius);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = NetBuilder::new().max_spot_distance(f64::NAN).build();
        assert!(matches!(result, Err(GeonetError::InvalidConfig(_))));

        let result = NetBuilder::new().imbalance_tolerance(0).build();
        assert!(matches!(result, Err(GeonetError::InvalidConfig(_))));
    }

    #[test]
    fn test_seed_points_keep_input_order() {
        let seeds: Vec<Point> = (0..50)
            .map(|i| Point::new((i % 7) as f64, i as f64 - 25.0))
            .collect();

        let net = NetBuilder::new()
            .seed_points(seeds[..20].iter().copied())
            .seed_points(seeds[20..].iter().copied())
            .build()
            .unwrap();

        assert_eq!(net.len(), 50);
        for (idx, record) in net.points().iter().enumerate() {
            assert_eq!(record.id, NodeId(idx as u64));
            assert_eq!(record.to_spot().point, seeds[idx]);
            assert_eq!(record.visit_count, 1);
        }
    }

    #[test]
    fn test_seeded_net_is_balanced_and_continues_ids() {
        let seeds: Vec<Point> = (0..128).map(|i| Point::new(0.0, i as f64 * 0.5)).collect();
        let mut net = NetBuilder::new().seed_points(seeds).build().unwrap();

        // A bulk build over 128 points is as shallow as possible
        assert_eq!(net.index().height(), 8);
        assert_eq!(net.index().max_imbalance(), 1);
        assert_eq!(net.stats().index.rebuilds, 0);

        // Close to seed 10, so it merges
        let merged = net.add_point(Point::new(0.0, 5.0002), None);
        assert_eq!(merged.id, NodeId(10));
        assert_eq!(net.visit_count(NodeId(10)), Some(2));

        let fresh = net.add_point(Point::new(90.0, 0.0), Some(merged.id));
        assert_eq!(fresh.id, NodeId(128));
        assert_eq!(net.edge_count(), 1);
    }
}
