//! Replenishment rules for consumable inventory
//!
//! The scanner/generator in the backend delegates every decision to these
//! functions: the threshold predicate, the order-quantity fallback chain,
//! the re-trigger cooldown, and the per-supplier grouping.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Quantity ordered when an item defines neither a reorder quantity nor a
/// maximum stock level.
pub fn default_order_quantity() -> Decimal {
    Decimal::from(50)
}

/// An item shortage the generator turns into a purchase order line.
#[derive(Debug, Clone)]
pub struct ShortageLine {
    pub item_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

impl ShortageLine {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// Replenishment triggers at or below the reorder point. A missing reorder
/// point never matches.
pub fn below_reorder_point(current_stock: Decimal, reorder_point: Option<Decimal>) -> bool {
    match reorder_point {
        Some(point) => current_stock <= point,
        None => false,
    }
}

/// Order quantity fallback chain: explicit reorder quantity, then refill to
/// maximum stock, then the fixed default.
pub fn order_quantity(
    reorder_quantity: Option<Decimal>,
    maximum_stock: Option<Decimal>,
    current_stock: Decimal,
) -> Decimal {
    if let Some(quantity) = reorder_quantity {
        quantity
    } else if let Some(maximum) = maximum_stock {
        maximum - current_stock
    } else {
        default_order_quantity()
    }
}

/// Re-trigger guard: an item already reordered inside the cooldown window is
/// skipped, so back-to-back generator runs cannot duplicate the same
/// shortage.
pub fn within_cooldown(
    last_reorder_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_hours: i64,
) -> bool {
    match last_reorder_date {
        Some(last) => now - last < Duration::hours(cooldown_hours),
        None => false,
    }
}

/// Partition shortage lines by supplier, preserving first-seen supplier
/// order. Lines without a supplier form their own group.
pub fn group_by_supplier(lines: Vec<ShortageLine>) -> Vec<(Option<Uuid>, Vec<ShortageLine>)> {
    let mut groups: Vec<(Option<Uuid>, Vec<ShortageLine>)> = Vec::new();
    for line in lines {
        match groups.iter_mut().find(|(key, _)| *key == line.supplier_id) {
            Some((_, group)) => group.push(line),
            None => groups.push((line.supplier_id, vec![line])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn null_reorder_point_never_matches() {
        assert!(!below_reorder_point(Decimal::ZERO, None));
        assert!(below_reorder_point(dec("10"), Some(dec("10"))));
        assert!(!below_reorder_point(dec("10.001"), Some(dec("10"))));
    }

    #[test]
    fn quantity_fallback_chain() {
        assert_eq!(order_quantity(Some(dec("20")), Some(dec("50")), dec("5")), dec("20"));
        assert_eq!(order_quantity(None, Some(dec("50")), dec("2")), dec("48"));
        assert_eq!(order_quantity(None, None, dec("2")), dec("50"));
    }

    #[test]
    fn cooldown_window() {
        let now = Utc::now();
        assert!(within_cooldown(Some(now - Duration::hours(2)), now, 24));
        assert!(!within_cooldown(Some(now - Duration::hours(25)), now, 24));
        assert!(!within_cooldown(None, now, 24));
    }

    #[test]
    fn grouping_preserves_supplier_partitions() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let line = |supplier| ShortageLine {
            item_id: Uuid::new_v4(),
            supplier_id: supplier,
            quantity: dec("1"),
            unit_cost: dec("1"),
        };
        let groups = group_by_supplier(vec![line(Some(a)), line(Some(b)), line(Some(a)), line(None)]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Some(a));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[2].0, None);
    }
}
