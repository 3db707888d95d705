//! Shared input validation and presentation rounding.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Fails with [`EngineError::InvalidInput`] if `value` is negative.
pub fn require_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

/// Fails with [`EngineError::InvalidInput`] unless `value` is above zero.
pub fn require_positive(field: &str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

/// Rounds a monetary amount for display, halves away from zero.
pub fn round_money(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("x", dec("0")).is_ok());
        assert!(require_non_negative("x", dec("12.5")).is_ok());
        assert!(require_non_negative("x", dec("-0.01")).is_err());
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        let negative_zero = -Decimal::ZERO;
        assert!(require_non_negative("x", negative_zero).is_ok());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("x", dec("0.01")).is_ok());
        let err = require_positive("principal", Decimal::ZERO).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec("8791.588723"), 2), dec("8791.59"));
        assert_eq!(round_money(dec("0.125"), 2), dec("0.13"));
        assert_eq!(round_money(dec("-0.125"), 2), dec("-0.13"));
        assert_eq!(round_money(dec("10"), 2), dec("10"));
    }
}
