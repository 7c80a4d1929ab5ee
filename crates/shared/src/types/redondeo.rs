//! Decimal rounding helpers for monetary derivation.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All derived quantities use half-away-from-zero rounding: intermediate
//! unit prices at 4 decimals, margins at 3, final line totals at 2.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to 2 decimals, half away from zero. Used for final money amounts.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to 3 decimals, half away from zero. Used for margin figures.
#[must_use]
pub fn round3(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to 4 decimals, half away from zero. Used for unit prices.
#[must_use]
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_midpoint_goes_away_from_zero() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round2(dec!(2.675)), dec!(2.68));
    }

    #[test]
    fn test_round4_keeps_unit_price_precision() {
        assert_eq!(round4(dec!(115.70247933)), dec!(115.7025));
        assert_eq!(round4(dec!(0.00005)), dec!(0.0001));
    }

    #[test]
    fn test_round3_margin() {
        assert_eq!(round3(dec!(39.9995)), dec!(40.000));
        assert_eq!(round3(dec!(12.3454)), dec!(12.345));
    }

    #[test]
    fn test_round_is_idempotent() {
        let v = round2(dec!(169.40));
        assert_eq!(round2(v), v);
    }
}
