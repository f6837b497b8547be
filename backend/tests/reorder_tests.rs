//! Automatic reordering tests
//!
//! Covers the threshold predicate, the order-quantity fallback chain, the
//! cooldown guard, and per-supplier grouping of shortage lines.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::reorder::{
    below_reorder_point, default_order_quantity, group_by_supplier, order_quantity,
    within_cooldown, ShortageLine,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line(supplier_id: Option<Uuid>, quantity: &str, unit_cost: &str) -> ShortageLine {
    ShortageLine {
        item_id: Uuid::new_v4(),
        supplier_id,
        quantity: dec(quantity),
        unit_cost: dec(unit_cost),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Trigger fires at the threshold, not only below it
    #[test]
    fn test_trigger_at_exact_threshold() {
        assert!(below_reorder_point(dec("10"), Some(dec("10"))));
        assert!(below_reorder_point(dec("9.999"), Some(dec("10"))));
        assert!(!below_reorder_point(dec("10.001"), Some(dec("10"))));
    }

    /// Items without a reorder point never trigger, even at zero stock
    #[test]
    fn test_no_reorder_point_never_triggers() {
        assert!(!below_reorder_point(Decimal::ZERO, None));
    }

    /// Explicit reorder quantity wins over the refill calculation
    #[test]
    fn test_quantity_prefers_explicit() {
        assert_eq!(
            order_quantity(Some(dec("20")), Some(dec("100")), dec("5")),
            dec("20")
        );
    }

    /// Without an explicit quantity, refill to maximum stock
    #[test]
    fn test_quantity_refills_to_maximum() {
        assert_eq!(order_quantity(None, Some(dec("50")), dec("2")), dec("48"));
    }

    /// With neither configured, fall back to the fixed default
    #[test]
    fn test_quantity_default() {
        assert_eq!(order_quantity(None, None, dec("2")), default_order_quantity());
        assert_eq!(default_order_quantity(), dec("50"));
    }

    /// A recent reorder suppresses the trigger for the cooldown window
    #[test]
    fn test_cooldown_suppresses_recent_reorders() {
        let now = Utc::now();
        assert!(within_cooldown(Some(now - Duration::hours(1)), now, 24));
        assert!(within_cooldown(Some(now - Duration::hours(23)), now, 24));
        assert!(!within_cooldown(Some(now - Duration::hours(24)), now, 24));
        assert!(!within_cooldown(None, now, 24));
    }

    /// One group per supplier, with the no-supplier group kept separate
    #[test]
    fn test_grouping_by_supplier() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let groups = group_by_supplier(vec![
            line(Some(a), "10", "1.000"),
            line(Some(b), "5", "2.000"),
            line(Some(a), "3", "1.500"),
            line(None, "7", "0.500"),
        ]);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Some(a));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Some(b));
        assert_eq!(groups[2].0, None);
        assert_eq!(groups[2].1.len(), 1);
    }

    /// Line totals multiply quantity by unit cost
    #[test]
    fn test_line_total() {
        let shortage = line(None, "12", "0.750");
        assert_eq!(shortage.line_total(), dec("9.000"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000).prop_map(|n| Decimal::new(n, 1))
    }

    fn supplier_strategy() -> impl Strategy<Value = Option<Uuid>> {
        // A small pool so groups actually collide
        prop_oneof![
            Just(None),
            Just(Some(Uuid::from_u128(1))),
            Just(Some(Uuid::from_u128(2))),
            Just(Some(Uuid::from_u128(3))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Grouping loses no lines and never mixes suppliers
        #[test]
        fn prop_grouping_is_a_partition(
            suppliers in prop::collection::vec(supplier_strategy(), 1..30)
        ) {
            let lines: Vec<ShortageLine> = suppliers
                .iter()
                .map(|s| line(*s, "1", "1"))
                .collect();
            let total = lines.len();

            let groups = group_by_supplier(lines);

            let grouped: usize = groups.iter().map(|(_, g)| g.len()).sum();
            prop_assert_eq!(grouped, total);

            for (key, group) in &groups {
                for l in group {
                    prop_assert_eq!(l.supplier_id, *key);
                }
            }

            // Group keys are unique
            for (i, (key, _)) in groups.iter().enumerate() {
                for (other, _) in groups.iter().skip(i + 1) {
                    prop_assert_ne!(*key, *other);
                }
            }
        }

        /// The fallback chain always produces the configured quantity when
        /// one exists
        #[test]
        fn prop_explicit_quantity_always_wins(
            explicit in quantity_strategy(),
            maximum in prop::option::of(quantity_strategy()),
            current in quantity_strategy()
        ) {
            prop_assert_eq!(
                order_quantity(Some(explicit), maximum, current),
                explicit
            );
        }

        /// The threshold predicate is monotone in current stock
        #[test]
        fn prop_threshold_monotone(
            point in quantity_strategy(),
            stock in quantity_strategy(),
            extra in quantity_strategy()
        ) {
            if below_reorder_point(stock + extra, Some(point)) {
                prop_assert!(below_reorder_point(stock, Some(point)));
            }
        }

        /// Cooldown is exact: strictly inside the window suppresses, at or
        /// past the boundary does not
        #[test]
        fn prop_cooldown_boundary(hours_ago in 0i64..100, cooldown in 1i64..100) {
            let now = Utc::now();
            let last = now - Duration::hours(hours_ago);
            let suppressed = within_cooldown(Some(last), now, cooldown);
            prop_assert_eq!(suppressed, hours_ago < cooldown);
        }
    }
}
