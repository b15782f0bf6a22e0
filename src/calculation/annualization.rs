//! Conversion between pay-period amounts and annual amounts.
//!
//! The procedure works on a 360-day year. Annual amounts are truncated to
//! cents, and so are amounts apportioned back to a pay period.

use rust_decimal::Decimal;

use super::rounding::round_down;
use crate::models::PayPeriod;

/// Converts a pay-period amount to a full year.
///
/// Multiplication happens before division so weekly amounts stay exact
/// where the statute expects them to.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::annualize;
/// use wage_tax_engine::models::PayPeriod;
///
/// assert_eq!(annualize(dec!(3000), PayPeriod::Month), dec!(36000));
/// assert_eq!(annualize(dec!(500), PayPeriod::Week), dec!(25714.28));
/// ```
pub fn annualize(amount: Decimal, period: PayPeriod) -> Decimal {
    let annual = match period {
        PayPeriod::Year => amount,
        PayPeriod::Month => amount * Decimal::from(12),
        PayPeriod::Week => amount * Decimal::from(360) / Decimal::from(7),
        PayPeriod::Day => amount * Decimal::from(360),
    };
    round_down(annual, 2)
}

/// Apportions an annual amount to a pay period, truncated to cents.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::apportion;
/// use wage_tax_engine::models::PayPeriod;
///
/// assert_eq!(apportion(dec!(3805), PayPeriod::Month), dec!(317.08));
/// assert_eq!(apportion(dec!(3805), PayPeriod::Year), dec!(3805));
/// ```
pub fn apportion(annual: Decimal, period: PayPeriod) -> Decimal {
    let share = match period {
        PayPeriod::Year => annual,
        PayPeriod::Month => annual / Decimal::from(12),
        PayPeriod::Week => annual * Decimal::from(7) / Decimal::from(360),
        PayPeriod::Day => annual / Decimal::from(360),
    };
    round_down(share, 2)
}
