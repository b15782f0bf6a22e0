//! Social insurance contribution models.

use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_half_down;

/// An amount stated per month and per year.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::models::PeriodAmount;
///
/// let amount = PeriodAmount::from_yearly(dec!(1000));
/// assert_eq!(amount.monthly, dec!(83.33));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAmount {
    /// The monthly amount.
    pub monthly: Decimal,
    /// The yearly amount.
    pub yearly: Decimal,
}

impl PeriodAmount {
    /// Derives the monthly amount from a yearly one, rounded half-down to cents.
    pub fn from_yearly(yearly: Decimal) -> Self {
        Self {
            monthly: round_half_down(yearly / Decimal::from(12), 2),
            yearly,
        }
    }

    /// Pairs amounts computed separately for both periods.
    pub fn new(monthly: Decimal, yearly: Decimal) -> Self {
        Self { monthly, yearly }
    }
}

impl Add for PeriodAmount {
    type Output = PeriodAmount;

    fn add(self, rhs: Self) -> Self::Output {
        PeriodAmount {
            monthly: self.monthly + rhs.monthly,
            yearly: self.yearly + rhs.yearly,
        }
    }
}

/// Employee and employer contribution of one insurance branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchContribution {
    /// Contribution paid by the employee.
    pub employee: PeriodAmount,
    /// Contribution paid by the employer.
    pub employer: PeriodAmount,
    /// Employee rate in percent of gross wage.
    pub employee_rate: Decimal,
    /// Employer rate in percent of gross wage.
    pub employer_rate: Decimal,
}

impl BranchContribution {
    /// A branch without any contribution.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Contributions to the four social insurance branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceResult {
    /// Health insurance.
    pub health: BranchContribution,
    /// Long-term care insurance.
    pub care: BranchContribution,
    /// Pension insurance.
    pub pension: BranchContribution,
    /// Unemployment insurance.
    pub unemployment: BranchContribution,
}

impl InsuranceResult {
    fn branches(&self) -> [&BranchContribution; 4] {
        [&self.health, &self.care, &self.pension, &self.unemployment]
    }

    /// Sum of all employee shares.
    pub fn employee_total(&self) -> PeriodAmount {
        self.branches()
            .iter()
            .fold(PeriodAmount::default(), |acc, b| acc + b.employee)
    }

    /// Sum of all employer shares.
    pub fn employer_total(&self) -> PeriodAmount {
        self.branches()
            .iter()
            .fold(PeriodAmount::default(), |acc, b| acc + b.employer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn branch(employee: Decimal, employer: Decimal) -> BranchContribution {
        BranchContribution {
            employee: PeriodAmount::from_yearly(employee),
            employer: PeriodAmount::from_yearly(employer),
            employee_rate: dec!(1),
            employer_rate: dec!(1),
        }
    }

    #[test]
    fn test_from_yearly_rounds_half_down() {
        // 0.06 / 12 = 0.005
        assert_eq!(PeriodAmount::from_yearly(dec!(0.06)).monthly, dec!(0.00));
        assert_eq!(PeriodAmount::from_yearly(dec!(3348)).monthly, dec!(279.00));
    }

    #[test]
    fn test_totals_sum_all_branches() {
        let result = InsuranceResult {
            health: branch(dec!(1200), dec!(1100)),
            care: branch(dec!(120), dec!(100)),
            pension: branch(dec!(1116), dec!(1116)),
            unemployment: branch(dec!(144), dec!(144)),
        };
        assert_eq!(result.employee_total().yearly, dec!(2580));
        assert_eq!(result.employer_total().yearly, dec!(2460));
        assert_eq!(result.employee_total().monthly, dec!(215.00));
    }

    #[test]
    fn test_none_is_zero() {
        let none = BranchContribution::none();
        assert_eq!(none.employee.yearly, Decimal::ZERO);
        assert_eq!(none.employer_rate, Decimal::ZERO);
    }
}
