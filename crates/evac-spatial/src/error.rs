//! Spatial-subsystem error type.

use thiserror::Error;

use evac_core::{EvacError, NodeId};

/// Errors produced by `evac-spatial`.
///
/// `NoRoute` and `NoFacility` are ordinary query outcomes rather than faults;
/// callers are expected to match on them and report "no path found".
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("no facility reachable from {from}")]
    NoFacility { from: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("unknown location {0:?}")]
    UnknownLocation(String),

    #[error("duplicate road between {a:?} and {b:?}")]
    DuplicateEdge { a: String, b: String },

    #[error("network has no node coordinates to snap against")]
    NoCoordinates,

    #[error(transparent)]
    Value(#[from] EvacError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
