//! GeoJSON output backend.
//!
//! Every path becomes a `LineString` feature, and every stop a `Point`
//! feature tagged `start`, `end`, or `via`, ready to drop onto a web map.
//! Stops without coordinates are left out; a path with fewer than two located
//! stops gets no line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Value, json};

use crate::report::Stop;
use crate::writer::OutputWriter;
use crate::{OutputResult, RouteReport};

/// Collects features from every report and writes one `FeatureCollection`
/// on [`finish`](OutputWriter::finish).
pub struct GeoJsonWriter<W: Write = BufWriter<File>> {
    out:      W,
    features: Vec<Value>,
    finished: bool,
}

impl GeoJsonWriter<BufWriter<File>> {
    /// Create (or truncate) `path`.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Ok(Self::from_writer(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> GeoJsonWriter<W> {
    pub fn from_writer(out: W) -> Self {
        Self { out, features: Vec::new(), finished: false }
    }

    /// Finish and return the underlying writer.
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        Ok(self.out)
    }
}

impl<W: Write> OutputWriter for GeoJsonWriter<W> {
    fn write_report(&mut self, report: &RouteReport) -> OutputResult<()> {
        self.features.extend(features(report));
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let collection = json!({
            "type": "FeatureCollection",
            "features": std::mem::take(&mut self.features),
        });
        serde_json::to_writer_pretty(&mut self.out, &collection)?;
        self.out.flush()?;
        Ok(())
    }
}

/// GeoJSON features for one report.
pub fn features(report: &RouteReport) -> Vec<Value> {
    let mut out = Vec::new();
    for (index, path) in report.paths.iter().enumerate() {
        let line: Vec<[f64; 2]> = path.iter().filter_map(|s| s.position.map(|p| p.lon_lat())).collect();
        if line.len() >= 2 {
            out.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": line },
                "properties": {
                    "path": index,
                    "total_time": report.total_time.as_f64(),
                    "total_distance": report.total_distance.as_f64(),
                    "facility": report.facility(),
                },
            }));
        }
        // Markers are shared by tied paths; emit them for the first only.
        if index == 0 {
            out.extend(markers(path));
        }
    }
    out
}

fn markers(path: &[Stop]) -> impl Iterator<Item = Value> + '_ {
    let last = path.len().saturating_sub(1);
    path.iter().enumerate().filter_map(move |(i, stop)| {
        let role = match i {
            0 => "start",
            i if i == last => "end",
            _ => "via",
        };
        stop.position.map(|p| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": p.lon_lat() },
                "properties": {
                    "name": stop.name,
                    "role": role,
                    "elapsed_time": stop.elapsed_time.as_f64(),
                    "elapsed_distance": stop.elapsed_distance.as_f64(),
                },
            })
        })
    })
}
