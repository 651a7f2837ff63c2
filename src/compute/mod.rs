//! Input checks that sit in front of the graph core.
//!
//! The core never validates coordinates; hosts that ingest untrusted tracks
//! run them through this layer first (see `Net::try_add_point`).

pub mod validation;
