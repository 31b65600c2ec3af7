//! Unit tests for evac-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod units {
    use crate::{Distance, EvacError, MAX_INPUT, SCALE, TravelTime};

    #[test]
    fn from_f64_rounds_to_micro_units() {
        assert_eq!(TravelTime::from_f64(5.0).unwrap(), TravelTime(5 * SCALE));
        assert_eq!(TravelTime::from_f64(0.1).unwrap(), TravelTime(100_000));
        assert_eq!(Distance::from_f64(0.000_000_4).unwrap(), Distance(0));
        assert_eq!(Distance::from_f64(0.000_000_6).unwrap(), Distance(1));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        for bad in [-1.0, f64::NAN, f64::INFINITY, -0.5] {
            assert!(matches!(
                TravelTime::from_f64(bad),
                Err(EvacError::InvalidQuantity { .. })
            ));
        }
    }

    #[test]
    fn rejects_values_above_the_input_bound() {
        assert_eq!(Distance::from_f64(MAX_INPUT).unwrap(), Distance(1_000_000_000 * SCALE));
        assert!(matches!(
            Distance::from_f64(MAX_INPUT * 1.5),
            Err(EvacError::InvalidQuantity { kind: "distance", .. })
        ));
        assert!(TravelTime::from_f64(1e13).is_err());
    }

    #[test]
    fn checked_add_stops_short_of_infinity() {
        let one = TravelTime(1);
        assert_eq!(one.checked_add(one), Some(TravelTime(2)));
        assert_eq!(TravelTime(u64::MAX - 1).checked_add(one), None);
        assert_eq!(TravelTime(u64::MAX / 2 + 1).checked_add(TravelTime(u64::MAX / 2 + 1)), None);
        assert_eq!(TravelTime::INFINITY.checked_add(TravelTime::ZERO), None);
    }

    #[test]
    fn decimal_sums_are_exact() {
        // 0.1 + 0.2 != 0.3 in f64, but is exact in fixed point.
        let a = TravelTime::from_f64(0.1).unwrap();
        let b = TravelTime::from_f64(0.2).unwrap();
        assert_eq!(a + b, TravelTime::from_f64(0.3).unwrap());
    }

    #[test]
    fn addition_saturates_at_infinity() {
        let t = TravelTime::INFINITY + TravelTime::from_f64(1.0).unwrap();
        assert!(t.is_infinite());
        assert_eq!(t.as_f64(), f64::INFINITY);
        assert_eq!(t.to_string(), "inf");
    }

    #[test]
    fn display_uses_whole_units() {
        assert_eq!(TravelTime::from_f64(17.5).unwrap().to_string(), "17.5");
        assert_eq!(Distance::from_f64(20.0).unwrap().to_string(), "20");
    }

    #[test]
    fn sum() {
        let total: Distance = [1.5, 2.25, 0.25]
            .into_iter()
            .map(|d| Distance::from_f64(d).unwrap())
            .sum();
        assert_eq!(total.as_f64(), 4.0);
    }
}

#[cfg(test)]
mod traffic {
    use crate::{TrafficCondition, TravelTime, adjusted_time};

    #[test]
    fn classify_codes() {
        assert_eq!(TrafficCondition::from_code(1.0), TrafficCondition::Normal);
        assert_eq!(TrafficCondition::from_code(2.0), TrafficCondition::Congested);
        assert_eq!(TrafficCondition::from_code(3.0), TrafficCondition::Severe);
    }

    #[test]
    fn unexpected_codes_default_to_normal() {
        for code in [0.0, 2.5, 4.0, -3.0, 1.999, f64::NAN] {
            assert_eq!(TrafficCondition::from_code(code), TrafficCondition::Normal, "code {code}");
            assert_eq!(adjusted_time(8.0, code), 8.0);
        }
    }

    #[test]
    fn multipliers() {
        assert_eq!(adjusted_time(10.0, 1.0), 10.0);
        assert_eq!(adjusted_time(10.0, 2.0), 20.0);
        assert_eq!(adjusted_time(10.0, 3.0), 25.0);
    }

    #[test]
    fn monotonic_in_code() {
        for base in [0.5, 1.0, 5.0, 7.3, 120.0] {
            let c1 = adjusted_time(base, 1.0);
            let c2 = adjusted_time(base, 2.0);
            let c3 = adjusted_time(base, 3.0);
            assert!(c1 < c2 && c2 < c3, "base {base}: {c1} {c2} {c3}");
        }
        assert_eq!(adjusted_time(0.0, 1.0), adjusted_time(0.0, 3.0));
    }

    #[test]
    fn fixed_point_apply_matches_float() {
        for base in [0.0, 1.0, 5.0, 7.3, 0.333_333] {
            for code in [1.0, 2.0, 3.0] {
                let exact = TrafficCondition::from_code(code)
                    .apply(TravelTime::from_f64(base).unwrap());
                let float = TravelTime::from_f64(adjusted_time(base, code)).unwrap();
                assert!(exact.0.abs_diff(float.0) <= 1, "base {base} code {code}");
            }
        }
    }

    #[test]
    fn severe_is_exact() {
        let t = TrafficCondition::Severe.apply(TravelTime::from_f64(5.0).unwrap());
        assert_eq!(t, TravelTime::from_f64(12.5).unwrap());
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(27.7172, 85.3240);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn parse_lat_lon() {
        let p: GeoPoint = "27.70, 85.32".parse().unwrap();
        assert_eq!(p, GeoPoint::new(27.70, 85.32));
        assert_eq!(p.lon_lat(), [85.32, 27.70]);
        assert!("27.70".parse::<GeoPoint>().is_err());
        assert!("95.0,10.0".parse::<GeoPoint>().is_err());
        assert!("north,east".parse::<GeoPoint>().is_err());
    }
}
