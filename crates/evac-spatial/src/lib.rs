//! `evac-spatial`: road network, traffic-aware routing, and facility search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `DuplicatePolicy` |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `search`, `ShortestPathTree` |
//! | [`paths`]   | Single-path and all-optimal-paths reconstruction              |
//! | [`nearest`] | `nearest_facility`, `FacilityMatch`                           |
//! | [`loader`]  | CSV loaders for roads, facilities, and coordinates            |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs per-facility searches on the Rayon pool.             |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `evac-core` types.   |

pub mod error;
pub mod loader;
pub mod nearest;
pub mod network;
pub mod paths;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use loader::{
    LoadReport, LoaderConfig, load_coordinates_csv, load_coordinates_reader, load_facilities_csv,
    load_facilities_reader, load_network, load_roads_csv, load_roads_reader,
};
pub use nearest::{FacilityMatch, nearest_facility, resolve_facilities};
pub use network::{DuplicatePolicy, RoadNetwork, RoadNetworkBuilder};
pub use paths::OptimalPaths;
pub use router::{DijkstraRouter, Route, Router, SearchMode, ShortestPathTree, search};
