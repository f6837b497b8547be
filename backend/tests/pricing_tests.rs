//! Order pricing tests
//!
//! Covers the POS pricing pipeline: category multipliers, promo discounts,
//! the flat 5% tax on the discounted subtotal, and delivery fees.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::pricing::{price_line, price_order, tax_rate_percent, MONEY_SCALE};
use shared::types::{FulfillmentType, ServiceCategory};

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

    /// Category multipliers are fixed
    #[test]
    fn test_category_multipliers() {
        assert_eq!(ServiceCategory::WashFold.multiplier(), dec("1.00"));
        assert_eq!(ServiceCategory::WashIron.multiplier(), dec("1.30"));
        assert_eq!(ServiceCategory::DryClean.multiplier(), dec("1.75"));
        assert_eq!(ServiceCategory::IronOnly.multiplier(), dec("0.80"));
    }

    /// Delivery fees are flat per fulfillment type
    #[test]
    fn test_delivery_fees() {
        assert_eq!(FulfillmentType::StorePickup.delivery_fee(), Decimal::ZERO);
        assert_eq!(FulfillmentType::HomePickup.delivery_fee(), dec("0.500"));
        assert_eq!(FulfillmentType::HomeDelivery.delivery_fee(), dec("1.000"));
    }

    /// 10 BHD wash & iron delivered: 10 x 1.3 x 1.05 + 1.000 = 14.650
    #[test]
    fn test_wash_iron_delivered_order() {
        let line = price_line(dec("10"), ServiceCategory::WashIron, 1);
        let breakdown = price_order(&[line.line_total], FulfillmentType::HomeDelivery, None);

        assert_eq!(breakdown.subtotal, dec("13.00"));
        assert_eq!(breakdown.discount, Decimal::ZERO);
        assert_eq!(breakdown.tax, dec("0.650"));
        assert_eq!(breakdown.delivery_fee, dec("1.000"));
        assert_eq!(breakdown.total, dec("14.650"));
    }

    /// Line totals scale linearly with quantity
    #[test]
    fn test_line_quantity_scaling() {
        let one = price_line(dec("3.500"), ServiceCategory::DryClean, 1);
        let four = price_line(dec("3.500"), ServiceCategory::DryClean, 4);

        assert_eq!(four.unit_price, one.unit_price);
        assert_eq!(four.line_total, one.line_total * Decimal::from(4));
    }

    /// Discount is taken before tax
    #[test]
    fn test_promo_applies_before_tax() {
        let breakdown = price_order(&[dec("20.000")], FulfillmentType::StorePickup, Some(dec("10")));

        // 20 - 2 = 18, taxed at 5% = 0.900
        assert_eq!(breakdown.discount, dec("2.000"));
        assert_eq!(breakdown.tax, dec("0.900"));
        assert_eq!(breakdown.total, dec("18.900"));
    }

    /// A 100% promo leaves only the delivery fee
    #[test]
    fn test_full_discount() {
        let breakdown = price_order(&[dec("8.000")], FulfillmentType::HomePickup, Some(dec("100")));

        assert_eq!(breakdown.discount, dec("8.000"));
        assert_eq!(breakdown.tax, Decimal::ZERO);
        assert_eq!(breakdown.total, dec("0.500"));
    }

    /// Empty carts price to the delivery fee alone
    #[test]
    fn test_empty_line_totals() {
        let breakdown = price_order(&[], FulfillmentType::StorePickup, None);
        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    /// Tax rate is 5%
    #[test]
    fn test_tax_rate() {
        assert_eq!(tax_rate_percent(), dec("5"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        // 0.100 to 100.000 BHD in fils
        (100i64..100_000).prop_map(|fils| Decimal::new(fils, 3))
    }

    fn category_strategy() -> impl Strategy<Value = ServiceCategory> {
        prop_oneof![
            Just(ServiceCategory::WashFold),
            Just(ServiceCategory::WashIron),
            Just(ServiceCategory::DryClean),
            Just(ServiceCategory::IronOnly),
        ]
    }

    fn fulfillment_strategy() -> impl Strategy<Value = FulfillmentType> {
        prop_oneof![
            Just(FulfillmentType::StorePickup),
            Just(FulfillmentType::HomePickup),
            Just(FulfillmentType::HomeDelivery),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The breakdown always reconciles:
        /// total = subtotal - discount + tax + delivery_fee
        #[test]
        fn prop_breakdown_reconciles(
            line_totals in prop::collection::vec(price_strategy(), 1..10),
            fulfillment in fulfillment_strategy(),
            promo in prop::option::of(0u32..=100)
        ) {
            let promo = promo.map(Decimal::from);
            let breakdown = price_order(&line_totals, fulfillment, promo);

            prop_assert_eq!(
                breakdown.total,
                breakdown.subtotal - breakdown.discount + breakdown.tax + breakdown.delivery_fee
            );
        }

        /// Discount never exceeds the subtotal for promos up to 100%
        #[test]
        fn prop_discount_bounded(
            line_totals in prop::collection::vec(price_strategy(), 1..10),
            promo in 0u32..=100
        ) {
            let breakdown = price_order(
                &line_totals,
                FulfillmentType::StorePickup,
                Some(Decimal::from(promo)),
            );

            prop_assert!(breakdown.discount >= Decimal::ZERO);
            prop_assert!(breakdown.discount <= breakdown.subtotal);
        }

        /// Unit prices are rounded to fils precision
        #[test]
        fn prop_unit_price_scale(
            base in price_strategy(),
            category in category_strategy(),
            quantity in 1u32..50
        ) {
            let line = price_line(base, category, quantity);
            prop_assert!(line.unit_price.scale() <= MONEY_SCALE);
            prop_assert_eq!(line.line_total, line.unit_price * Decimal::from(quantity));
        }

        /// Adding a promo never increases the total
        #[test]
        fn prop_promo_never_increases_total(
            line_totals in prop::collection::vec(price_strategy(), 1..10),
            fulfillment in fulfillment_strategy(),
            promo in 0u32..=100
        ) {
            let without = price_order(&line_totals, fulfillment, None);
            let with = price_order(&line_totals, fulfillment, Some(Decimal::from(promo)));

            prop_assert!(with.total <= without.total);
        }
    }
}
