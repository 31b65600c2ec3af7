//! `evac-core`: foundational types for the evacuation router.
//!
//! This crate is a dependency of every other `evac-*` crate.  It has no
//! `evac-*` dependencies and a single required external one (`thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`                                        |
//! | [`units`]   | Fixed-point `TravelTime` and `Distance`                   |
//! | [`traffic`] | `TrafficCondition` and the adjusted-time cost function    |
//! | [`geo`]     | `GeoPoint`, haversine distance                            |
//! | [`error`]   | `EvacError`, `EvacResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod traffic;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EvacError, EvacResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use traffic::{TrafficCondition, adjusted_time};
pub use units::{Distance, MAX_INPUT, SCALE, TravelTime};
