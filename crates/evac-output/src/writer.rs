//! The `OutputWriter` trait implemented by all file writers.

use crate::{OutputResult, RouteReport};

/// Trait implemented by the CSV and GeoJSON writers.
pub trait OutputWriter {
    /// Write one query result.
    fn write_report(&mut self, report: &RouteReport) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; may be called more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
