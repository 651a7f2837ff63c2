//! The graph builder: turns raw GPS samples into spots and edges.
//!
//! Each incoming sample is compared with the nearest existing spot. Closer
//! than `max_spot_distance` meters and it is counted as another visit of that
//! spot; otherwise it becomes a new spot. Consecutive samples of one track
//! that land on different spots add (or revisit) the edge between them.
//!
//! # Order dependence
//!
//! Whichever sample arrives first claims the neighborhood around it. Feeding
//! the same samples in another order (tracks swapped, or a track reversed) can
//! produce a different graph. Both results are valid; there is no canonical
//! one.
//!
//! # Concurrency
//!
//! All mutation goes through `&mut self`. A rebuild reshapes the index in the
//! middle of an insertion, so hosts sharing a net between threads must wrap
//! it in their own lock.

mod meta;
mod snapshot;

pub use meta::{NetStats, SpotMeta, TrackSummary};
pub use snapshot::NetSnapshot;

use crate::builder::NetBuilder;
use crate::compute::validation::validate_geographic_point;
use crate::config::Config;
use crate::error::{GeonetError, Result};
use crate::spatial_index::SpatialIndex;
use geo::Point;
use geonet_types::edge::EdgeKey;
use geonet_types::point::{NodeId, SpotPoint};
use geonet_types::record::{EdgeRecord, NodeRecord};
use rustc_hash::{FxHashMap, FxHashSet};

/// Deduplicated graph of spots and edges built from GPS tracks.
///
/// # Examples
///
/// ```rust
/// use geonet::{Net, Point};
///
/// let mut net = Net::new();
///
/// // Two samples ~10 m apart collapse into one spot
/// let first = net.add_point(Point::new(13.4050, 52.5200), None);
/// let second = net.add_point(Point::new(13.4050, 52.52009), Some(first.id));
/// assert_eq!(first.id, second.id);
///
/// // ~200 m further north is a new spot, joined by an edge
/// let third = net.add_point(Point::new(13.4050, 52.5218), Some(second.id));
/// assert_ne!(third.id, second.id);
///
/// assert_eq!(net.points().len(), 2);
/// assert_eq!(net.edges().len(), 1);
/// ```
#[derive(Debug)]
pub struct Net {
    config: Config,
    index: SpatialIndex,
    spots: FxHashMap<NodeId, SpotMeta>,
    edges: Vec<EdgeRecord>,
    edge_slots: FxHashMap<EdgeKey, usize>,
    tracks: Vec<TrackSummary>,
    next_id: NodeId,
}

impl Default for Net {
    fn default() -> Self {
        Self::new()
    }
}

impl Net {
    /// Create an empty net with the default configuration.
    pub fn new() -> Self {
        Self::empty(Config::default())
    }

    /// Create an empty net, rejecting invalid configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    pub fn builder() -> NetBuilder {
        NetBuilder::new()
    }

    fn empty(config: Config) -> Self {
        log::debug!(
            "created empty net, max spot distance: {} m",
            config.max_spot_distance
        );

        Self {
            index: SpatialIndex::new(config.imbalance_tolerance, config.pruning),
            config,
            spots: FxHashMap::default(),
            edges: Vec::new(),
            edge_slots: FxHashMap::default(),
            tracks: Vec::new(),
            next_id: NodeId(0),
        }
    }

    /// Assemble a net from existing spots and edges.
    ///
    /// The index is built in one pass. Ids continue after the largest spot id.
    pub(crate) fn from_parts(
        config: Config,
        spots: Vec<SpotMeta>,
        edges: Vec<EdgeRecord>,
    ) -> Result<Self> {
        config.validate()?;

        let mut spot_map = FxHashMap::default();
        spot_map.reserve(spots.len());
        for meta in spots {
            let id = meta.spot().id;
            if spot_map.insert(id, meta).is_some() {
                return Err(GeonetError::InvalidSnapshot(format!(
                    "duplicate node id {}",
                    id
                )));
            }
        }

        let mut edge_slots = FxHashMap::default();
        edge_slots.reserve(edges.len());
        for (slot, edge) in edges.iter().enumerate() {
            let key = edge.key();
            for end in [key.a(), key.b()] {
                if !spot_map.contains_key(&end) {
                    return Err(GeonetError::InvalidSnapshot(format!(
                        "edge {} references unknown node {}",
                        key, end
                    )));
                }
            }
            if edge_slots.insert(key, slot).is_some() {
                return Err(GeonetError::InvalidSnapshot(format!(
                    "duplicate edge {}",
                    key
                )));
            }
        }

        let next_id = spot_map
            .keys()
            .max()
            .map_or(NodeId(0), |max_id| max_id.next());
        let points: Vec<SpotPoint> = spot_map.values().map(SpotMeta::spot).collect();
        let index = SpatialIndex::build(points, config.imbalance_tolerance, config.pruning);

        log::debug!(
            "created net from existing data: {} spots, {} edges, max spot distance: {} m",
            spot_map.len(),
            edges.len(),
            config.max_spot_distance
        );

        Ok(Self {
            config,
            index,
            spots: spot_map,
            edges,
            edge_slots,
            tracks: Vec::new(),
            next_id,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the spatial index holding the spots.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn generate_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    fn store_spot(&mut self, point: Point) -> SpotPoint {
        let spot = SpotPoint::new(point, self.generate_id());
        log::debug!(
            "storing spot {}: ({}, {})",
            spot.id,
            spot.latitude(),
            spot.longitude()
        );

        self.index.insert(spot);
        self.spots.insert(spot.id, SpotMeta::new(spot));
        spot
    }

    fn link(&mut self, previous: NodeId, current: NodeId) {
        // Self edges are ignored
        let Some(key) = EdgeKey::new(previous, current) else {
            return;
        };

        match self.edge_slots.get(&key) {
            Some(&slot) => {
                log::debug!("reusing existing edge: {}", key);
                self.edges[slot].record_visit();
            }
            None => {
                log::debug!("adding edge: {}", key);
                self.edge_slots.insert(key, self.edges.len());
                self.edges.push(EdgeRecord::new(key, 1));
            }
        }
    }

    /// Feed one raw sample into the net.
    ///
    /// `previous` is the spot returned for the preceding sample of the same
    /// track, or `None` for the first sample. Returns the spot the sample was
    /// merged into or created as; pass its id as `previous` for the next
    /// sample.
    ///
    /// No validation happens here; see [`Net::try_add_point`].
    pub fn add_point(&mut self, point: Point, previous: Option<NodeId>) -> SpotPoint {
        log::debug!(
            "add point: ({}, {}), previous: {:?}",
            point.y(),
            point.x(),
            previous
        );

        let spot = match self.index.nearest(&point) {
            Some(nearest) if nearest.distance < self.config.max_spot_distance => {
                log::debug!(
                    "reusing spot {}, which is {:.2} m far, limit is {} m",
                    nearest.point.id,
                    nearest.distance,
                    self.config.max_spot_distance
                );
                if let Some(meta) = self.spots.get_mut(&nearest.point.id) {
                    meta.absorb(&point);
                }
                nearest.point
            }
            _ => self.store_spot(point),
        };

        if let Some(previous) = previous {
            self.link(previous, spot.id);
        }

        spot
    }

    /// Like [`Net::add_point`], but rejects bad coordinates and previous ids
    /// this net never issued.
    pub fn try_add_point(&mut self, point: Point, previous: Option<NodeId>) -> Result<SpotPoint> {
        if let Err(e) = validate_geographic_point(&point) {
            log::warn!("Rejecting sample: {}", e);
            return Err(e);
        }

        if let Some(previous) = previous
            && !self.spots.contains_key(&previous)
        {
            log::warn!("Rejecting sample linked to unknown spot {}", previous);
            return Err(GeonetError::UnknownNode(previous));
        }

        Ok(self.add_point(point, previous))
    }

    /// Feed a whole track, threading each result into the next sample.
    ///
    /// The first sample creates no edge. `track_id` is only recorded in the
    /// returned summary and in [`Net::tracks`].
    pub fn add_track<I>(&mut self, track_id: impl Into<String>, points: I) -> TrackSummary
    where
        I: IntoIterator<Item = Point>,
    {
        let track_id = track_id.into();
        let spots_before = self.spots.len();
        let edges_before = self.edges.len();

        let mut previous = None;
        let mut samples = 0;
        let mut visited = FxHashSet::default();
        for point in points {
            let spot = self.add_point(point, previous);
            previous = Some(spot.id);
            visited.insert(spot.id);
            samples += 1;
        }

        let summary = TrackSummary {
            track_id,
            samples,
            new_spots: self.spots.len() - spots_before,
            new_edges: self.edges.len() - edges_before,
            distinct_spots: visited.len(),
            last_spot: previous,
        };

        log::debug!(
            "track {} added: {} samples, {} new spots, {} new edges",
            summary.track_id,
            summary.samples,
            summary.new_spots,
            summary.new_edges
        );

        self.tracks.push(summary.clone());
        summary
    }

    /// Short diagnostic line, starting with the index height.
    pub fn stat(&self) -> String {
        self.stats().to_string()
    }

    pub fn stats(&self) -> NetStats {
        NetStats {
            spots: self.spots.len(),
            edges: self.edges.len(),
            tracks: self.tracks.len(),
            index: self.index.stats(),
        }
    }

    /// All spots with their visit counts, ordered by id.
    pub fn points(&self) -> Vec<NodeRecord> {
        let mut records: Vec<NodeRecord> = self
            .index
            .points()
            .iter()
            .map(|spot| {
                let visits = self.spots.get(&spot.id).map_or(0, SpotMeta::visits);
                NodeRecord::new(spot, visits)
            })
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }

    /// All edges in creation order, each stored as `(min id, max id)`.
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Look up the edge between two spots, in either order.
    pub fn edge(&self, x: NodeId, y: NodeId) -> Option<&EdgeRecord> {
        let key = EdgeKey::new(x, y)?;
        self.edge_slots.get(&key).map(|&slot| &self.edges[slot])
    }

    pub fn spot(&self, id: NodeId) -> Option<&SpotMeta> {
        self.spots.get(&id)
    }

    pub fn visit_count(&self, id: NodeId) -> Option<u64> {
        self.spots.get(&id).map(SpotMeta::visits)
    }

    /// Mean position of all samples merged into a spot.
    pub fn centroid(&self, id: NodeId) -> Option<Point> {
        self.spots.get(&id).map(SpotMeta::centroid)
    }

    /// Summaries of every `add_track` call, oldest first.
    pub fn tracks(&self) -> &[TrackSummary] {
        &self.tracks
    }

    /// Number of spots.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
