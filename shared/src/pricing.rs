//! Order pricing rules for the storefront and POS
//!
//! All amounts are BHD with three decimal places. Pricing is deliberately
//! static: a per-category multiplier on the service base price, a flat 5%
//! tax, a fixed delivery fee per fulfillment type, and at most one
//! percentage promo code. There is no promotion stacking.

use rust_decimal::Decimal;

use crate::types::{FulfillmentType, ServiceCategory};

/// Money is rounded to the smallest BHD unit (fils, 3 decimal places).
pub const MONEY_SCALE: u32 = 3;

/// Flat tax applied to the discounted subtotal, in percent.
pub fn tax_rate_percent() -> Decimal {
    Decimal::new(5, 0)
}

impl ServiceCategory {
    /// Price multiplier applied to the service base price.
    pub fn multiplier(&self) -> Decimal {
        match self {
            ServiceCategory::WashFold => Decimal::new(100, 2), // 1.00
            ServiceCategory::WashIron => Decimal::new(130, 2), // 1.30
            ServiceCategory::DryClean => Decimal::new(175, 2), // 1.75
            ServiceCategory::IronOnly => Decimal::new(80, 2),  // 0.80
        }
    }
}

impl FulfillmentType {
    /// Flat delivery surcharge in BHD.
    pub fn delivery_fee(&self) -> Decimal {
        match self {
            FulfillmentType::StorePickup => Decimal::ZERO,
            FulfillmentType::HomePickup => Decimal::new(500, 3), // 0.500
            FulfillmentType::HomeDelivery => Decimal::new(1000, 3), // 1.000
        }
    }
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Base price after the category multiplier.
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Full price breakdown for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Price a single cart line: `base_price x multiplier x quantity`.
pub fn price_line(base_price: Decimal, category: ServiceCategory, quantity: u32) -> PricedLine {
    let unit_price = (base_price * category.multiplier()).round_dp(MONEY_SCALE);
    let line_total = unit_price * Decimal::from(quantity);
    PricedLine {
        unit_price,
        quantity,
        line_total,
    }
}

/// Price an order from its line totals.
///
/// `promo_percent_off` is the percentage of an already-validated promo code;
/// it is applied to the subtotal before tax.
pub fn price_order(
    line_totals: &[Decimal],
    fulfillment: FulfillmentType,
    promo_percent_off: Option<Decimal>,
) -> PriceBreakdown {
    let subtotal: Decimal = line_totals.iter().sum();
    let discount = promo_percent_off
        .map(|pct| (subtotal * pct / Decimal::new(100, 0)).round_dp(MONEY_SCALE))
        .unwrap_or(Decimal::ZERO);
    let discounted = subtotal - discount;
    let tax = (discounted * tax_rate_percent() / Decimal::new(100, 0)).round_dp(MONEY_SCALE);
    let delivery_fee = fulfillment.delivery_fee();
    PriceBreakdown {
        subtotal,
        discount,
        tax,
        delivery_fee,
        total: discounted + tax + delivery_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn wash_iron_home_delivery_with_tax() {
        // 10 BHD base, 1.3x service, 5% tax, 1.000 BHD delivery
        let line = price_line(dec("10"), ServiceCategory::WashIron, 1);
        assert_eq!(line.line_total, dec("13.00"));

        let breakdown = price_order(
            &[line.line_total],
            FulfillmentType::HomeDelivery,
            None,
        );
        assert_eq!(breakdown.tax, dec("0.650"));
        assert_eq!(breakdown.total, dec("14.650"));
    }

    #[test]
    fn store_pickup_has_no_fee() {
        let breakdown = price_order(&[dec("5.000")], FulfillmentType::StorePickup, None);
        assert_eq!(breakdown.delivery_fee, Decimal::ZERO);
        assert_eq!(breakdown.total, dec("5.250"));
    }

    #[test]
    fn promo_applies_before_tax() {
        // 20 BHD subtotal, 10% off => 18.000 taxed at 5% => 18.900
        let breakdown = price_order(
            &[dec("20.000")],
            FulfillmentType::StorePickup,
            Some(dec("10")),
        );
        assert_eq!(breakdown.discount, dec("2.000"));
        assert_eq!(breakdown.tax, dec("0.900"));
        assert_eq!(breakdown.total, dec("18.900"));
    }
}
