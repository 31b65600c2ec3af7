//! `evac-output`: rendering and writing route query results.
//!
//! | Backend   | Type             | Output                                    |
//! |-----------|------------------|-------------------------------------------|
//! | Console   | `RouteReport`    | `Display` impl, arrow-joined paths        |
//! | CSV       | `CsvWriter`      | one row per stop                          |
//! | GeoJSON   | `GeoJsonWriter`  | `FeatureCollection` of lines and markers  |
//!
//! File backends implement [`OutputWriter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let routes = DijkstraRouter.optimal_routes(&net, from, to)?;
//! let report = RouteReport::for_routes(&net, &routes);
//! print!("{report}");
//!
//! let mut w = GeoJsonWriter::new(Path::new("route.geojson"))?;
//! w.write_report(&report)?;
//! w.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod geojson;
pub mod report;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use geojson::GeoJsonWriter;
pub use report::{NO_FACILITY_MESSAGE, NO_PATH_MESSAGE, ReportKind, RouteReport, Stop, join_path};
pub use writer::OutputWriter;
