//! Flat node and edge rows for export collaborators.
//!
//! These are the shapes a writer (JSON file, database, map renderer) consumes.
//! Field names serialize in camelCase: `{id, latitude, longitude, visitCount}`,
//! `{a, b, visitCount}` and `{id, latitude, longitude}` for centroids.

use crate::edge::EdgeKey;
use crate::point::{NodeId, SpotPoint};
use geo::Point;
use serde::{Deserialize, Serialize};

/// One spot of the graph with its visit counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_count: u64,
}

impl NodeRecord {
    pub fn new(spot: &SpotPoint, visit_count: u64) -> Self {
        Self {
            id: spot.id,
            latitude: spot.latitude(),
            longitude: spot.longitude(),
            visit_count,
        }
    }

    pub fn to_spot(&self) -> SpotPoint {
        SpotPoint::from_lat_lon(self.latitude, self.longitude, self.id)
    }
}

/// Mean position of the raw samples merged into one spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentroidRecord {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
}

impl CentroidRecord {
    pub fn new(id: NodeId, centroid: &Point<f64>) -> Self {
        Self {
            id,
            latitude: centroid.y(),
            longitude: centroid.x(),
        }
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// One edge of the graph with its visit counter. `a < b` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEdgeRecord")]
pub struct EdgeRecord {
    a: NodeId,
    b: NodeId,
    visit_count: u64,
}

impl EdgeRecord {
    pub fn new(key: EdgeKey, visit_count: u64) -> Self {
        Self {
            a: key.a(),
            b: key.b(),
            visit_count,
        }
    }

    pub fn a(&self) -> NodeId {
        self.a
    }

    pub fn b(&self) -> NodeId {
        self.b
    }

    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub fn key(&self) -> EdgeKey {
        // a < b is upheld by both constructors
        EdgeKey {
            a: self.a,
            b: self.b,
        }
    }

    /// Count one more traversal of this edge.
    pub fn record_visit(&mut self) {
        self.visit_count += 1;
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEdgeRecord {
    a: NodeId,
    b: NodeId,
    visit_count: u64,
}

impl TryFrom<RawEdgeRecord> for EdgeRecord {
    type Error = String;

    fn try_from(raw: RawEdgeRecord) -> Result<Self, Self::Error> {
        if raw.a >= raw.b {
            return Err(format!(
                "edge record must satisfy a < b, got ({}, {})",
                raw.a, raw.b
            ));
        }
        Ok(Self {
            a: raw.a,
            b: raw.b,
            visit_count: raw.visit_count,
        })
    }
}
