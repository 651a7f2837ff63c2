//! # geonet-types
//!
//! Core data types shared by the geonet graph builder and its consumers.
//!
//! - **Point types**: `NodeId`, `SpotPoint`
//! - **Edge types**: `EdgeKey`, a canonical unordered pair of node ids
//! - **Records**: `NodeRecord`, `EdgeRecord`, the flat rows handed to export code
//!
//! Coordinates are carried as `geo::Point` values with x = longitude and
//! y = latitude, in degrees.
//!
//! ## Examples
//!
//! ```rust
//! use geonet_types::edge::EdgeKey;
//! use geonet_types::point::NodeId;
//!
//! let key = EdgeKey::new(NodeId(5), NodeId(2)).unwrap();
//! assert_eq!(key.a(), NodeId(2));
//! assert_eq!(key.b(), NodeId(5));
//! ```

pub mod edge;
pub mod point;
pub mod record;
