//! Export of the finished graph and restore from exported records.
//!
//! A snapshot is the node and edge lists in their export shape, plus the
//! running centroid of every spot. Writing it to a file or a database is left
//! to the host; this module only converts between a `Net`, the records and
//! JSON text.

use super::{Net, SpotMeta};
use crate::config::Config;
use crate::error::{GeonetError, Result};
use geonet_types::point::NodeId;
use geonet_types::record::{CentroidRecord, EdgeRecord, NodeRecord};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Node and edge lists of a net.
///
/// # Examples
///
/// ```rust
/// use geonet::{Config, Net, NetSnapshot, Point};
///
/// let mut net = Net::new();
/// net.add_track("a", vec![Point::new(2.35, 48.85), Point::new(2.36, 48.86)]);
///
/// let json = net.snapshot().to_json().unwrap();
/// let restored = Net::from_snapshot(NetSnapshot::from_json(&json).unwrap(), Config::default()).unwrap();
///
/// assert_eq!(restored.points(), net.points());
/// assert_eq!(restored.edges(), net.edges());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetSnapshot {
    pub points: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    /// Spots without an entry restart their centroid at the spot itself
    #[serde(default)]
    pub centroids: Vec<CentroidRecord>,
}

impl NetSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Net {
    /// Export the current spots and edges.
    pub fn snapshot(&self) -> NetSnapshot {
        let mut centroids: Vec<CentroidRecord> =
            self.spots.values().map(SpotMeta::centroid_record).collect();
        centroids.sort_by_key(|record| record.id);

        NetSnapshot {
            points: self.points(),
            edges: self.edges.clone(),
            centroids,
        }
    }

    /// Rebuild a net from exported records.
    ///
    /// Visit counts and centroids are kept, the index is built in one pass and
    /// new spots get ids after the largest restored id. Fails on duplicate spot
    /// ids, duplicate edges, or edges and centroids that point at missing spots.
    pub fn from_snapshot(snapshot: NetSnapshot, config: Config) -> Result<Self> {
        let mut spots: Vec<SpotMeta> = snapshot
            .points
            .iter()
            .map(|record| SpotMeta::restored(record.to_spot(), record.visit_count))
            .collect();

        if !snapshot.centroids.is_empty() {
            let slots: FxHashMap<NodeId, usize> = spots
                .iter()
                .enumerate()
                .map(|(slot, meta)| (meta.spot().id, slot))
                .collect();

            for record in &snapshot.centroids {
                let Some(&slot) = slots.get(&record.id) else {
                    let err = GeonetError::InvalidSnapshot(format!(
                        "centroid references unknown node {}",
                        record.id
                    ));
                    log::warn!("Rejecting snapshot: {}", err);
                    return Err(err);
                };
                spots[slot] = spots[slot].with_centroid(&record.point());
            }
        }

        let net = Self::from_parts(config, spots, snapshot.edges).inspect_err(|e| {
            log::warn!("Rejecting snapshot: {}", e);
        })?;

        log::info!(
            "restored net from snapshot: {} spots, {} edges, index height: {}",
            net.len(),
            net.edge_count(),
            net.index().height()
        );

        Ok(net)
    }
}
