//! CSV loaders for roads, facilities, and location coordinates.
//!
//! # CSV formats
//!
//! Every table starts with a header row, which is skipped.  Extra trailing
//! fields are ignored.
//!
//! ```csv
//! origin,destination,distance,time,traffic
//! Depot,School,10,5,1
//! School,Hospital,10,5,3
//! ```
//!
//! ```csv
//! name
//! Hospital
//! ```
//!
//! ```csv
//! name,lat,lon
//! Depot,27.7000,85.3000
//! ```
//!
//! # Malformed rows
//!
//! A road row with fewer than five fields, unparsable numbers, or a negative
//! distance or time is skipped, logged at `warn`, and counted in
//! [`LoadReport::rows_skipped`].  Coordinate rows follow the same rule with
//! three fields.  Malformed rows never fail a load; I/O and CSV framing
//! errors do.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{info, warn};

use evac_core::GeoPoint;

use crate::network::{DuplicatePolicy, RoadNetwork, RoadNetworkBuilder};
use crate::SpatialResult;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Loader settings shared by all tables.
#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    /// How the road loader resolves a repeated pair of locations.
    pub duplicates: DuplicatePolicy,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { duplicates: DuplicatePolicy::default(), delimiter: b',' }
    }
}

/// Row counts from one table load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen, header excluded.
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Road rows that collided with an earlier road.
    pub duplicates: usize,
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RoadRecord {
    origin:      String,
    destination: String,
    distance:    f64,
    time:        f64,
    traffic:     f64,
}

#[derive(Deserialize)]
struct CoordinateRecord {
    name: String,
    lat:  f64,
    lon:  f64,
}

const ROAD_FIELDS: usize = 5;
const COORDINATE_FIELDS: usize = 3;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the road table at `path` into a fresh builder.
///
/// Returns the builder rather than a network so that coordinates can still
/// be attached with [`load_coordinates_csv`] before [`RoadNetworkBuilder::build`].
pub fn load_roads_csv(
    path: &Path,
    config: &LoaderConfig,
) -> SpatialResult<(RoadNetworkBuilder, LoadReport)> {
    load_roads_reader(File::open(path)?, config)
}

/// Like [`load_roads_csv`] but accepts any `Read` source.
pub fn load_roads_reader<R: Read>(
    reader: R,
    config: &LoaderConfig,
) -> SpatialResult<(RoadNetworkBuilder, LoadReport)> {
    let mut builder = RoadNetworkBuilder::new().with_duplicate_policy(config.duplicates);
    let mut report = LoadReport::default();

    for result in csv_reader(reader, config).records() {
        let record = result?;
        report.rows_read += 1;

        let Some(row) = leading::<RoadRecord>(&record, ROAD_FIELDS) else {
            skip(&record, &mut report, "malformed road row");
            continue;
        };
        match builder.add_road_by_name(&row.origin, &row.destination, row.distance, row.time, row.traffic) {
            Ok(()) => {}
            Err(crate::SpatialError::Value(e)) => {
                warn!(line = line_of(&record), error = %e, "invalid road row skipped");
                report.rows_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    report.duplicates = builder.duplicate_count();
    info!(
        locations = builder.node_count(),
        roads = builder.road_count(),
        rows = report.rows_read,
        skipped = report.rows_skipped,
        duplicates = report.duplicates,
        "road table loaded"
    );
    Ok((builder, report))
}

/// Load facility names (first field of each row) from `path`.
pub fn load_facilities_csv(path: &Path, config: &LoaderConfig) -> SpatialResult<Vec<String>> {
    load_facilities_reader(File::open(path)?, config)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
///
/// Rows with an empty first field are skipped.  Order is preserved; it
/// decides ties in [`crate::nearest_facility`].
pub fn load_facilities_reader<R: Read>(reader: R, config: &LoaderConfig) -> SpatialResult<Vec<String>> {
    let mut facilities = Vec::new();
    for result in csv_reader(reader, config).records() {
        let record = result?;
        match record.get(0) {
            Some(name) if !name.is_empty() => facilities.push(name.to_owned()),
            _ => {}
        }
    }
    info!(facilities = facilities.len(), "facility table loaded");
    Ok(facilities)
}

/// Attach coordinates from the table at `path` to locations in `builder`.
pub fn load_coordinates_csv(
    path: &Path,
    builder: &mut RoadNetworkBuilder,
    config: &LoaderConfig,
) -> SpatialResult<LoadReport> {
    load_coordinates_reader(File::open(path)?, builder, config)
}

/// Like [`load_coordinates_csv`] but accepts any `Read` source.
///
/// Names that are not locations of the road table are ignored.
pub fn load_coordinates_reader<R: Read>(
    reader: R,
    builder: &mut RoadNetworkBuilder,
    config: &LoaderConfig,
) -> SpatialResult<LoadReport> {
    let mut report = LoadReport::default();
    let mut located = 0usize;

    for result in csv_reader(reader, config).records() {
        let record = result?;
        report.rows_read += 1;

        let Some(row) = leading::<CoordinateRecord>(&record, COORDINATE_FIELDS) else {
            skip(&record, &mut report, "malformed coordinate row");
            continue;
        };
        if let Some(node) = builder.node_id(&row.name) {
            builder.set_position(node, GeoPoint::new(row.lat, row.lon));
            located += 1;
        }
    }

    info!(rows = report.rows_read, located, skipped = report.rows_skipped, "coordinate table loaded");
    Ok(report)
}

/// Load roads and, optionally, coordinates, and build the network.
pub fn load_network(
    roads: &Path,
    coordinates: Option<&Path>,
    config: &LoaderConfig,
) -> SpatialResult<(RoadNetwork, LoadReport)> {
    let (mut builder, report) = load_roads_csv(roads, config)?;
    if let Some(path) = coordinates {
        load_coordinates_csv(path, &mut builder, config)?;
    }
    Ok((builder.build(), report))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R, config: &LoaderConfig) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(config.delimiter)
        .from_reader(reader)
}

/// Deserialize the first `n` fields of `record` positionally.  `None` if the
/// record is too short or a field does not parse.
fn leading<T: for<'de> Deserialize<'de>>(record: &StringRecord, n: usize) -> Option<T> {
    if record.len() < n {
        return None;
    }
    let head: StringRecord = record.iter().take(n).collect();
    head.deserialize(None).ok()
}

fn skip(record: &StringRecord, report: &mut LoadReport, reason: &str) {
    warn!(line = line_of(record), fields = record.len(), "{reason}; skipped");
    report.rows_skipped += 1;
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}
