//! Usage-rate derivation tests
//!
//! The rate is average daily consumption over a trailing 30-day window,
//! derived from `out` stock movements only.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::usage::{usage_rate, USAGE_WINDOW_DAYS};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 300 units consumed over the window is 10 per day
    #[test]
    fn test_simple_average() {
        let out = vec![dec("100"), dec("150"), dec("50")];
        assert_eq!(usage_rate(&out), Some(dec("10")));
    }

    /// The window is 30 days
    #[test]
    fn test_window_length() {
        assert_eq!(USAGE_WINDOW_DAYS, 30);
    }

    /// Zero consumption yields no rate instead of zero
    #[test]
    fn test_no_consumption_yields_none() {
        assert_eq!(usage_rate(&[]), None);
    }

    /// Fractional daily rates are preserved
    #[test]
    fn test_fractional_rate() {
        assert_eq!(usage_rate(&[dec("45")]), Some(dec("1.5")));
    }

    /// A single movement still averages over the full window
    #[test]
    fn test_single_movement_averages_over_window() {
        assert_eq!(usage_rate(&[dec("30")]), Some(dec("1")));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// rate x window = total consumption
        #[test]
        fn prop_rate_times_window_is_total(
            out in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let total: Decimal = out.iter().sum();
            let rate = usage_rate(&out).expect("non-empty input has a rate");
            prop_assert_eq!(rate * Decimal::from(USAGE_WINDOW_DAYS), total);
        }

        /// Positive consumption always yields a positive rate
        #[test]
        fn prop_rate_is_positive(
            out in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let rate = usage_rate(&out).expect("non-empty input has a rate");
            prop_assert!(rate > Decimal::ZERO);
        }

        /// The rate is order-independent
        #[test]
        fn prop_rate_is_order_independent(
            out in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut reversed = out.clone();
            reversed.reverse();
            prop_assert_eq!(usage_rate(&out), usage_rate(&reversed));
        }
    }
}
