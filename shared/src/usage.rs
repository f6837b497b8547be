//! Usage-rate derivation from the stock movement log

use rust_decimal::Decimal;

/// Trailing window the rate is averaged over, in days.
pub const USAGE_WINDOW_DAYS: i64 = 30;

/// Average daily consumption from the `out` movements inside the window.
///
/// Returns `None` when there was no consumption at all, in which case the
/// stored rate is left untouched rather than reset to zero.
pub fn usage_rate(out_quantities: &[Decimal]) -> Option<Decimal> {
    if out_quantities.is_empty() {
        return None;
    }
    let total: Decimal = out_quantities.iter().sum();
    Some(total / Decimal::from(USAGE_WINDOW_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn three_hundred_units_over_window_is_ten_per_day() {
        let out = vec![
            Decimal::from(100),
            Decimal::from(150),
            Decimal::from(50),
        ];
        assert_eq!(usage_rate(&out), Some(Decimal::from(10)));
    }

    #[test]
    fn no_consumption_leaves_rate_unset() {
        assert_eq!(usage_rate(&[]), None);
    }

    #[test]
    fn fractional_rates_survive() {
        let out = vec![Decimal::from_str("45").unwrap()];
        assert_eq!(usage_rate(&out), Some(Decimal::from_str("1.5").unwrap()));
    }
}
