//! Decimal rounding primitives used by every statutory calculation.
//!
//! The withholding procedure fixes the rounding mode of each intermediate
//! amount. Nothing in the engine relies on the default rounding of
//! [`Decimal`]; every truncation goes through one of these helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Truncates toward zero at `dp` decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::round_down;
///
/// assert_eq!(round_down(dec!(1234.5678), 2), dec!(1234.56));
/// assert_eq!(round_down(dec!(-1.239), 2), dec!(-1.23));
/// ```
pub fn round_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}

/// Rounds away from zero at `dp` decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::round_up;
///
/// assert_eq!(round_up(dec!(5247.01), 0), dec!(5248));
/// assert_eq!(round_up(dec!(5248), 0), dec!(5248));
/// ```
pub fn round_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::AwayFromZero)
}

/// Rounds to nearest at `dp` decimal places, ties toward zero.
///
/// Used for contribution shares, where half a cent goes to the payer.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::round_half_down;
///
/// assert_eq!(round_half_down(dec!(10.125), 2), dec!(10.12));
/// assert_eq!(round_half_down(dec!(10.126), 2), dec!(10.13));
/// ```
pub fn round_half_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointTowardZero)
}

/// Divides and truncates the quotient toward zero at `dp` decimal places.
pub fn div_down(dividend: Decimal, divisor: Decimal, dp: u32) -> Decimal {
    round_down(dividend / divisor, dp)
}

/// Takes `rate` percent of `base`, rounded half-down to cents.
pub fn percent_of(base: Decimal, rate: Decimal) -> Decimal {
    round_half_down(base * rate / Decimal::ONE_HUNDRED, 2)
}

/// Clamps a statutory amount that may not become negative.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_down_truncates_positive_values() {
        assert_eq!(round_down(dec!(4092.8375), 0), dec!(4092));
    }

    #[test]
    fn round_down_truncates_toward_zero_for_negatives() {
        assert_eq!(round_down(dec!(-0.999), 2), dec!(-0.99));
    }

    #[test]
    fn round_up_moves_away_from_zero() {
        assert_eq!(round_up(dec!(0.001), 2), dec!(0.01));
        assert_eq!(round_up(dec!(-0.001), 2), dec!(-0.01));
    }

    #[test]
    fn round_half_down_keeps_midpoint_low() {
        assert_eq!(round_half_down(dec!(0.005), 2), dec!(0.00));
        assert_eq!(round_half_down(dec!(0.0051), 2), dec!(0.01));
    }

    #[test]
    fn div_down_truncates_quotient() {
        assert_eq!(div_down(dec!(409200), dec!(12), 0), dec!(34100));
        assert_eq!(div_down(dec!(100), dec!(7), 2), dec!(14.28));
    }

    #[test]
    fn percent_of_rounds_to_cents() {
        assert_eq!(percent_of(dec!(3000), dec!(9.3)), dec!(279.00));
        assert_eq!(percent_of(dec!(1234.56), dec!(0.75)), dec!(9.26));
    }

    #[test]
    fn floor_at_zero_clamps_negative_amounts() {
        assert_eq!(floor_at_zero(dec!(-12.5)), Decimal::ZERO);
        assert_eq!(floor_at_zero(dec!(12.5)), dec!(12.5));
    }
}
