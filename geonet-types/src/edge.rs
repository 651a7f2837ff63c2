//! Canonical edge keys.

use crate::point::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An unordered pair of distinct node ids, stored as `(min, max)`.
///
/// The constructor is the only way to build a key, so a key is always
/// canonical and never a self-edge. Deserialization goes through the same
/// check.
///
/// # Examples
///
/// ```
/// use geonet_types::edge::EdgeKey;
/// use geonet_types::point::NodeId;
///
/// let forward = EdgeKey::new(NodeId(2), NodeId(5)).unwrap();
/// let reverse = EdgeKey::new(NodeId(5), NodeId(2)).unwrap();
/// assert_eq!(forward, reverse);
///
/// assert!(EdgeKey::new(NodeId(4), NodeId(4)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEdgeKey")]
pub struct EdgeKey {
    pub(crate) a: NodeId,
    pub(crate) b: NodeId,
}

impl EdgeKey {
    /// Build the canonical key for an edge between `x` and `y`.
    ///
    /// Returns `None` when both ends are the same node.
    pub fn new(x: NodeId, y: NodeId) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller id.
    pub fn a(&self) -> NodeId {
        self.a
    }

    /// The larger id.
    pub fn b(&self) -> NodeId {
        self.b
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Deserialize)]
struct RawEdgeKey {
    a: NodeId,
    b: NodeId,
}

impl TryFrom<RawEdgeKey> for EdgeKey {
    type Error = String;

    fn try_from(raw: RawEdgeKey) -> Result<Self, Self::Error> {
        if raw.a >= raw.b {
            return Err(format!(
                "edge must be stored as (min, max) of two distinct ids, got ({}, {})",
                raw.a, raw.b
            ));
        }
        Ok(Self { a: raw.a, b: raw.b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let key = EdgeKey::new(NodeId(5), NodeId(2)).unwrap();
        assert_eq!((key.a(), key.b()), (NodeId(2), NodeId(5)));
        assert_eq!(key.to_string(), "2-5");
    }

    #[test]
    fn test_self_edge_rejected() {
        assert!(EdgeKey::new(NodeId(0), NodeId(0)).is_none());
    }

    #[test]
    fn test_deserialize_rejects_reversed_pair() {
        let ok: EdgeKey = serde_json::from_str(r#"{"a": 1, "b": 3}"#).unwrap();
        assert_eq!(ok, EdgeKey::new(NodeId(3), NodeId(1)).unwrap());

        assert!(serde_json::from_str::<EdgeKey>(r#"{"a": 3, "b": 1}"#).is_err());
        assert!(serde_json::from_str::<EdgeKey>(r#"{"a": 2, "b": 2}"#).is_err());
    }
}
