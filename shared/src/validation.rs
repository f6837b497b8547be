//! Validation helpers shared by the API input types

use rust_decimal::Decimal;

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a customer phone number: optional leading `+`, 8-15 digits.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() >= 8 && digits.len() <= 15 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("Invalid phone number")
    }
}

/// Promo codes are 3-20 uppercase alphanumeric characters.
pub fn validate_promo_code(code: &str) -> Result<(), &'static str> {
    if code.len() >= 3
        && code.len() <= 20
        && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        Ok(())
    } else {
        Err("Promo code must be 3-20 uppercase alphanumeric characters")
    }
}

/// Percent discounts live in [0, 100].
pub fn validate_percent(percent: Decimal) -> Result<(), &'static str> {
    if percent >= Decimal::ZERO && percent <= Decimal::from(100) {
        Ok(())
    } else {
        Err("Percent must be between 0 and 100")
    }
}

/// Stock quantities are never negative.
pub fn validate_non_negative_stock(stock: Decimal) -> Result<(), &'static str> {
    if stock >= Decimal::ZERO {
        Ok(())
    } else {
        Err("Stock level cannot be negative")
    }
}

/// Item stock-level invariant: the reorder point cannot exceed the maximum
/// stock when both are set.
pub fn validate_stock_levels(
    reorder_point: Option<Decimal>,
    maximum_stock: Option<Decimal>,
) -> Result<(), &'static str> {
    if let (Some(point), Some(maximum)) = (reorder_point, maximum_stock) {
        if point > maximum {
            return Err("Reorder point cannot exceed maximum stock");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn email_checks() {
        assert!(validate_email("driver@laundry.bh").is_ok());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn phone_checks() {
        assert!(validate_phone("+97333112233").is_ok());
        assert!(validate_phone("33112233").is_ok());
        assert!(validate_phone("12ab34").is_err());
    }

    #[test]
    fn stock_level_invariant() {
        let d = |s: &str| Decimal::from_str(s).unwrap();
        assert!(validate_stock_levels(Some(d("10")), Some(d("50"))).is_ok());
        assert!(validate_stock_levels(Some(d("60")), Some(d("50"))).is_err());
        assert!(validate_stock_levels(Some(d("60")), None).is_ok());
    }

    #[test]
    fn promo_code_format() {
        assert!(validate_promo_code("WASH10").is_ok());
        assert!(validate_promo_code("wash10").is_err());
        assert!(validate_promo_code("AB").is_err());
    }
}
