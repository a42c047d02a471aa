//! Tests for the threshold classifier
//! Every table boundary, plus monotonicity over random inputs

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    classify_high_temperature, classify_low_temperature, classify_rain, classify_snow,
    classify_wind_average, classify_wind_gust, status_label, AlertLevel,
};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn levels(values: &[u8]) -> Vec<AlertLevel> {
    values
        .iter()
        .map(|v| AlertLevel::try_from(i64::from(*v)).unwrap())
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_wind_average_boundaries() {
        let inputs = [0, 10, 11, 14, 15, 18, 19, 22, 23, 120];
        let got: Vec<_> = inputs.iter().map(|v| classify_wind_average(*v)).collect();
        assert_eq!(got, levels(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5]));
    }

    #[test]
    fn test_wind_gust_boundaries() {
        let inputs = [0, 18, 19, 21, 22, 27, 28, 33, 34];
        let got: Vec<_> = inputs.iter().map(|v| classify_wind_gust(*v)).collect();
        assert_eq!(got, levels(&[1, 1, 2, 2, 3, 3, 4, 4, 5]));
    }

    #[test]
    fn test_rain_boundaries() {
        assert_eq!(classify_rain(Decimal::ZERO), AlertLevel::Safe);
        assert_eq!(classify_rain(dec("0.01")), AlertLevel::Caution);
        assert_eq!(classify_rain(dec("0.49")), AlertLevel::Caution);
        assert_eq!(classify_rain(dec("0.5")), AlertLevel::Watch);
        assert_eq!(classify_rain(dec("0.99")), AlertLevel::Watch);
        assert_eq!(classify_rain(dec("1")), AlertLevel::Alert);
        assert_eq!(classify_rain(dec("4.99")), AlertLevel::Alert);
        assert_eq!(classify_rain(dec("5")), AlertLevel::Cancel);
        assert_eq!(classify_rain(dec("42.7")), AlertLevel::Cancel);
    }

    #[test]
    fn test_snow_uses_precipitation_table() {
        assert_eq!(classify_snow(dec("0.0")), AlertLevel::Safe);
        assert_eq!(classify_snow(dec("0.3")), AlertLevel::Caution);
        assert_eq!(classify_snow(dec("0.7")), AlertLevel::Watch);
        assert_eq!(classify_snow(dec("3")), AlertLevel::Alert);
        assert_eq!(classify_snow(dec("12")), AlertLevel::Cancel);
    }

    #[test]
    fn test_negative_amount_is_level_two() {
        assert_eq!(classify_rain(dec("-1")), AlertLevel::Caution);
    }

    #[test]
    fn test_high_temperature_boundaries() {
        let inputs = [-10, 5, 6, 25, 26, 28, 29, 30, 31, 35, 36];
        let got: Vec<_> = inputs.iter().map(|v| classify_high_temperature(*v)).collect();
        assert_eq!(got, levels(&[1, 1, 1, 1, 2, 2, 3, 3, 4, 4, 5]));
    }

    #[test]
    fn test_low_temperature_boundaries() {
        assert_eq!(classify_low_temperature(6), AlertLevel::Safe);
        assert_eq!(classify_low_temperature(5), AlertLevel::Caution);
        assert_eq!(classify_low_temperature(2), AlertLevel::Caution);
        assert_eq!(classify_low_temperature(1), AlertLevel::Watch);
        assert_eq!(classify_low_temperature(0), AlertLevel::Watch);
        assert_eq!(classify_low_temperature(-1), AlertLevel::Alert);
        assert_eq!(classify_low_temperature(-5), AlertLevel::Alert);
        assert_eq!(classify_low_temperature(-6), AlertLevel::Cancel);
        assert_eq!(classify_low_temperature(-10), AlertLevel::Cancel);
    }

    #[test]
    fn test_status_labels() {
        let labels: Vec<_> = (1..=5).map(|v| status_label(v).unwrap()).collect();
        assert_eq!(labels, ["SEGUR", "PRECAUCIÓ", "VIGILANT", "ALERTA", "CANCEL·LAT"]);
        assert_eq!(status_label(0), None);
        assert_eq!(status_label(-3), None);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(AlertLevel::Safe < AlertLevel::Caution);
        assert!(AlertLevel::Alert < AlertLevel::Cancel);
        assert_eq!(AlertLevel::ALL.iter().max(), Some(&AlertLevel::Cancel));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Rain/snow amounts from 0.00 to 20.00 mm
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=2000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn temperature_strategy() -> impl Strategy<Value = i32> {
        -30i32..=50i32
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_wind_is_monotone(a in 0i32..150, b in 0i32..150) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_wind_average(lo) <= classify_wind_average(hi));
            prop_assert!(classify_wind_gust(lo) <= classify_wind_gust(hi));
        }

        #[test]
        fn prop_precipitation_is_monotone(a in amount_strategy(), b in amount_strategy()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_rain(lo) <= classify_rain(hi));
            prop_assert_eq!(classify_rain(a), classify_snow(a));
        }

        #[test]
        fn prop_temperature_directions(a in temperature_strategy(), b in temperature_strategy()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_high_temperature(lo) <= classify_high_temperature(hi));
            prop_assert!(classify_low_temperature(lo) >= classify_low_temperature(hi));
        }

        #[test]
        fn prop_level_value_round_trips_label(v in 1i64..=5) {
            let level = AlertLevel::try_from(v).unwrap();
            prop_assert_eq!(i64::from(level.value()), v);
            prop_assert_eq!(status_label(v), Some(level.label()));
        }
    }
}
