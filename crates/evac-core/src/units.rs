//! Fixed-point travel time and distance.
//!
//! Both quantities are stored as unsigned micro-units (`value × SCALE`) so that
//! path sums are exact and associative.  The all-paths search decides whether
//! two routes are tied by comparing these integers; with `f32`/`f64` sums the
//! answer would depend on the order in which edges were added.
//!
//! The unit itself is whatever the input tables use (minutes and kilometres
//! in the shipped data); nothing in the engine depends on it.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::{EvacError, EvacResult};

/// Micro-units per whole unit.
pub const SCALE: u64 = 1_000_000;

/// Largest accepted input value, in whole units.  Keeps a single edge (after
/// the 2.5× traffic multiplier) thousands of edges away from overflowing a
/// path sum.
pub const MAX_INPUT: f64 = 1e9;

/// Generate a fixed-point quantity wrapper around `u64`.
macro_rules! fixed_point {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $kind:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u64);

        impl $name {
            pub const ZERO: $name = $name(0);

            /// "Not reached yet."  Addition saturates here, so an unreached
            /// total never wraps into a small value.
            pub const INFINITY: $name = $name(u64::MAX);

            /// Convert a raw input value, rounding to the nearest micro-unit.
            ///
            /// Rejects negative, NaN, and infinite values (Dijkstra requires
            /// non-negative weights) and anything above [`MAX_INPUT`].
            pub fn from_f64(value: f64) -> EvacResult<Self> {
                if !value.is_finite() || !(0.0..=MAX_INPUT).contains(&value) {
                    return Err(EvacError::InvalidQuantity { kind: $kind, value });
                }
                Ok($name((value * SCALE as f64).round() as u64))
            }

            /// Value in whole units.  `INFINITY` maps to `f64::INFINITY`.
            #[inline]
            pub fn as_f64(self) -> f64 {
                if self.is_infinite() {
                    f64::INFINITY
                } else {
                    self.0 as f64 / SCALE as f64
                }
            }

            #[inline]
            pub fn is_infinite(self) -> bool {
                self.0 == u64::MAX
            }

            #[inline]
            pub fn saturating_add(self, other: $name) -> $name {
                $name(self.0.saturating_add(other.0))
            }

            /// Sum, or `None` if it would reach `INFINITY`.
            #[inline]
            pub fn checked_add(self, other: $name) -> Option<$name> {
                self.0.checked_add(other.0).filter(|&v| v != u64::MAX).map($name)
            }
        }

        impl Add for $name {
            type Output = $name;

            #[inline]
            fn add(self, other: $name) -> $name {
                self.saturating_add(other)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                iter.fold($name::ZERO, Add::add)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_infinite() {
                    f.write_str("inf")
                } else {
                    write!(f, "{}", self.as_f64())
                }
            }
        }
    };
}

fixed_point! {
    /// Traffic-adjusted travel time.  Used as the Dijkstra edge cost.
    pub struct TravelTime, "travel time";
}

fixed_point! {
    /// Road length.  Secondary metric; unaffected by traffic.
    pub struct Distance, "distance";
}
