//! Traffic conditions and the edge cost function.
//!
//! Road tables carry a numeric traffic code per segment.  Only the exact
//! codes `2` and `3` slow a road down; every other code, including fractional
//! and out-of-range ones, is treated as free-flowing.
//!
//! | Code  | Condition   | Multiplier |
//! |-------|-------------|------------|
//! | `2`   | `Congested` | 2.0        |
//! | `3`   | `Severe`    | 2.5        |
//! | other | `Normal`    | 1.0        |

use crate::TravelTime;

/// Congestion level of a road segment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficCondition {
    #[default]
    Normal,
    Congested,
    Severe,
}

impl TrafficCondition {
    /// Classify a raw traffic code from the road table.
    pub fn from_code(code: f64) -> Self {
        if code == 2.0 {
            TrafficCondition::Congested
        } else if code == 3.0 {
            TrafficCondition::Severe
        } else {
            TrafficCondition::Normal
        }
    }

    /// Travel-time multiplier.
    pub fn multiplier(self) -> f64 {
        match self {
            TrafficCondition::Normal    => 1.0,
            TrafficCondition::Congested => 2.0,
            TrafficCondition::Severe    => 2.5,
        }
    }

    /// Multiplier as an exact `numerator / denominator` pair.
    #[inline]
    fn ratio(self) -> (u64, u64) {
        match self {
            TrafficCondition::Normal    => (1, 1),
            TrafficCondition::Congested => (2, 1),
            TrafficCondition::Severe    => (5, 2),
        }
    }

    /// Apply the multiplier to a fixed-point base time (round half up).
    #[inline]
    pub fn apply(self, base: TravelTime) -> TravelTime {
        let (num, den) = self.ratio();
        TravelTime(base.0.saturating_mul(num).saturating_add(den / 2) / den)
    }
}

impl std::fmt::Display for TrafficCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TrafficCondition::Normal    => "normal",
            TrafficCondition::Congested => "congested",
            TrafficCondition::Severe    => "severe",
        })
    }
}

/// Adjusted travel time for a base time and a raw traffic code.
///
/// Floating-point form of [`TrafficCondition::apply`], for callers that work
/// outside the fixed-point domain.
pub fn adjusted_time(base_time: f64, traffic_code: f64) -> f64 {
    base_time * TrafficCondition::from_code(traffic_code).multiplier()
}
