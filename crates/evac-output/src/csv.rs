//! CSV output backend.
//!
//! One row per stop per path:
//!
//! ```csv
//! path,step,location,lat,lon,elapsed_time,elapsed_distance,traffic
//! 0,0,A,27.7,85.3,0,0,
//! 0,1,B,27.71,85.31,5,10,normal
//! ```
//!
//! Reports are numbered in write order; `path` keeps counting across reports.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RouteReport};

const HEADER: [&str; 8] = [
    "path", "step", "location", "lat", "lon", "elapsed_time", "elapsed_distance", "traffic",
];

/// Writes route stops to a CSV file.
pub struct CsvWriter<W: Write = File> {
    out:       Writer<W>,
    next_path: usize,
    finished:  bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) `path` and write the header row.
    pub fn new(path: &Path) -> OutputResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(HEADER)?;
        Ok(Self { out, next_path: 0, finished: false })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.out.flush()?;
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_report(&mut self, report: &RouteReport) -> OutputResult<()> {
        for path in &report.paths {
            for (step, stop) in path.iter().enumerate() {
                let (lat, lon) = stop
                    .position
                    .map_or((String::new(), String::new()), |p| (p.lat.to_string(), p.lon.to_string()));
                self.out.write_record(&[
                    self.next_path.to_string(),
                    step.to_string(),
                    stop.name.clone(),
                    lat,
                    lon,
                    stop.elapsed_time.to_string(),
                    stop.elapsed_distance.to_string(),
                    stop.traffic.map(|t| t.to_string()).unwrap_or_default(),
                ])?;
            }
            self.next_path += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
