//! Value-level error type.
//!
//! Sub-crates define their own error enums and wrap `EvacError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised while converting raw input values into core types.
#[derive(Debug, Error)]
pub enum EvacError {
    #[error("invalid {kind} {value}: expected a finite, non-negative number")]
    InvalidQuantity { kind: &'static str, value: f64 },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `evac-core`.
pub type EvacResult<T> = Result<T, EvacError>;
