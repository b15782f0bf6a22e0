//! Gross wage and pay period models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::annualize;
use crate::error::EngineError;

/// The period a wage is paid for (Lohnzahlungszeitraum).
///
/// The procedure uses a 360-day year: a week is 7/360 and a day 1/360 of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriod {
    /// A calendar year.
    Year,
    /// A month.
    Month,
    /// A week.
    Week,
    /// A day.
    Day,
}

impl PayPeriod {
    /// Returns the numeric period code (1 = year, 2 = month, 3 = week, 4 = day).
    pub fn code(self) -> u8 {
        match self {
            PayPeriod::Year => 1,
            PayPeriod::Month => 2,
            PayPeriod::Week => 3,
            PayPeriod::Day => 4,
        }
    }

    /// Parses a numeric period code.
    pub fn from_code(code: u8) -> Result<Self, EngineError> {
        match code {
            1 => Ok(PayPeriod::Year),
            2 => Ok(PayPeriod::Month),
            3 => Ok(PayPeriod::Week),
            4 => Ok(PayPeriod::Day),
            _ => Err(EngineError::InvalidInput {
                field: "pay_period".to_string(),
                message: format!("unknown pay period code {}", code),
            }),
        }
    }
}

/// A gross wage as stated for a pay period.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::models::{GrossWage, PayPeriod};
///
/// let wage = GrossWage::new(dec!(3000), PayPeriod::Month);
/// assert_eq!(wage.annualized(), dec!(36000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossWage {
    /// The amount for one pay period.
    pub amount: Decimal,
    /// The pay period of the amount.
    pub period: PayPeriod,
}

impl GrossWage {
    /// Creates a wage for a pay period.
    pub fn new(amount: Decimal, period: PayPeriod) -> Self {
        Self { amount, period }
    }

    /// Creates a yearly wage.
    pub fn yearly(amount: Decimal) -> Self {
        Self::new(amount, PayPeriod::Year)
    }

    /// The wage converted to a full year, truncated to cents.
    pub fn annualized(&self) -> Decimal {
        annualize(self.amount, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_period_codes_round_trip() {
        for code in 1..=4u8 {
            assert_eq!(PayPeriod::from_code(code).unwrap().code(), code);
        }
        assert!(PayPeriod::from_code(5).is_err());
    }

    #[test]
    fn test_weekly_wage_uses_360_day_year() {
        let wage = GrossWage::new(dec!(700), PayPeriod::Week);
        assert_eq!(wage.annualized(), dec!(36000));
    }

    #[test]
    fn test_daily_wage_annualizes_by_360() {
        let wage = GrossWage::new(dec!(100.01), PayPeriod::Day);
        assert_eq!(wage.annualized(), dec!(36003.60));
    }

    #[test]
    fn test_period_serialization() {
        assert_eq!(
            serde_json::to_string(&PayPeriod::Month).unwrap(),
            "\"month\""
        );
    }
}
