//! Social insurance contributions.
//!
//! [`InsuranceCalculator`] splits the four statutory insurances between
//! employee and employer. Contributions are computed on the annual gross
//! wage, capped at the year's ceilings; monthly amounts are derived from the
//! yearly ones.

use rust_decimal::Decimal;

use super::contribution_rates::care_split;
use super::rounding::{floor_at_zero, percent_of, round_half_down};
use crate::config::YearRuleSet;
use crate::models::{
    BranchContribution, HealthInsurance, InsuranceResult, PensionInsurance, PeriodAmount,
    TaxpayerProfile,
};

/// Computes social insurance contributions for one accounting year.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::InsuranceCalculator;
/// use wage_tax_engine::config::RuleBook;
/// use wage_tax_engine::models::{AccountingYear, FederalState, TaxClass, TaxpayerProfile};
///
/// let book = RuleBook::builtin().unwrap();
/// let calculator = InsuranceCalculator::new(book.get(AccountingYear::Y2025).unwrap());
/// let profile = TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990);
///
/// let result = calculator.compute(&profile, dec!(36000));
/// assert_eq!(result.pension.employee.monthly, dec!(279.00));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InsuranceCalculator<'a> {
    rules: &'a YearRuleSet,
}

impl<'a> InsuranceCalculator<'a> {
    /// Creates a calculator for a validated rule set.
    pub fn new(rules: &'a YearRuleSet) -> Self {
        Self { rules }
    }

    /// Computes all four branches for an annual gross wage.
    pub fn compute(&self, profile: &TaxpayerProfile, annual_gross: Decimal) -> InsuranceResult {
        let gross = floor_at_zero(annual_gross);
        let mini_job = gross < self.rules.social_insurance.mini_job_annual_limit();

        InsuranceResult {
            health: self.health(profile, gross, mini_job),
            care: self.care(profile, gross, mini_job),
            pension: self.pension(profile, gross),
            unemployment: self.unemployment(profile, gross, mini_job),
        }
    }

    fn health(&self, profile: &TaxpayerProfile, gross: Decimal, mini_job: bool) -> BranchContribution {
        let si = &self.rules.social_insurance;
        if mini_job {
            return BranchContribution::none();
        }

        let general_rate = match profile.health_insurance {
            HealthInsurance::StatutoryGeneral => si.health_general_rate,
            HealthInsurance::StatutoryReduced => si.health_reduced_rate,
            HealthInsurance::Private => return self.private_health(profile, gross),
        };
        let base = gross.min(si.ceilings.health);
        let share = (general_rate + profile.add_on_rate) / Decimal::TWO;
        split(base, share, share)
    }

    fn private_health(&self, profile: &TaxpayerProfile, gross: Decimal) -> BranchContribution {
        let total = profile.private_contribution * Decimal::from(12);
        let employer = if profile.employer_subsidy {
            round_half_down(total / Decimal::TWO, 2)
                .min(self.rules.social_insurance.private_health_subsidy_cap())
        } else {
            Decimal::ZERO
        };
        let employee = total - employer;

        BranchContribution {
            employee: PeriodAmount::from_yearly(employee),
            employer: PeriodAmount::from_yearly(employer),
            employee_rate: effective_rate(employee, gross),
            employer_rate: effective_rate(employer, gross),
        }
    }

    fn care(&self, profile: &TaxpayerProfile, gross: Decimal, mini_job: bool) -> BranchContribution {
        if mini_job || profile.is_privately_insured() {
            return BranchContribution::none();
        }
        let rates = care_split(self.rules, profile);
        let base = gross.min(self.rules.social_insurance.ceilings.health);
        split(base, rates.employee, rates.employer)
    }

    fn pension(&self, profile: &TaxpayerProfile, gross: Decimal) -> BranchContribution {
        if profile.pension_insurance == PensionInsurance::Exempt {
            return BranchContribution::none();
        }
        let base = gross.min(self.rules.pension_ceiling(profile.state.is_east()));
        let share = self.rules.social_insurance.pension_rate / Decimal::TWO;
        split(base, share, share)
    }

    fn unemployment(&self, profile: &TaxpayerProfile, gross: Decimal, mini_job: bool) -> BranchContribution {
        if mini_job {
            return BranchContribution::none();
        }
        let base = gross.min(self.rules.pension_ceiling(profile.state.is_east()));
        let share = self.rules.social_insurance.unemployment_rate / Decimal::TWO;
        split(base, share, share)
    }
}

fn split(base: Decimal, employee_rate: Decimal, employer_rate: Decimal) -> BranchContribution {
    BranchContribution {
        employee: PeriodAmount::from_yearly(percent_of(base, employee_rate)),
        employer: PeriodAmount::from_yearly(percent_of(base, employer_rate)),
        employee_rate,
        employer_rate,
    }
}

fn effective_rate(amount: Decimal, gross: Decimal) -> Decimal {
    if gross.is_zero() {
        Decimal::ZERO
    } else {
        round_half_down(amount / gross * Decimal::ONE_HUNDRED, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleBook;
    use crate::models::{AccountingYear, FederalState, TaxClass};
    use rust_decimal_macros::dec;

    fn rules(year: AccountingYear) -> YearRuleSet {
        RuleBook::builtin().unwrap().get(year).unwrap().clone()
    }

    fn create_test_profile() -> TaxpayerProfile {
        TaxpayerProfile {
            add_on_rate: dec!(2.5),
            ..TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990)
        }
    }

    #[test]
    fn test_statutory_contributions_2025() {
        let rules = rules(AccountingYear::Y2025);
        let result = InsuranceCalculator::new(&rules).compute(&create_test_profile(), dec!(36000));

        // (14.6 + 2.5) / 2 = 8.55%
        assert_eq!(result.health.employee.yearly, dec!(3078.00));
        assert_eq!(result.health.employee.monthly, dec!(256.50));
        assert_eq!(result.health.employer_rate, dec!(8.55));
        // 1.8 + 0.6 childless surcharge
        assert_eq!(result.care.employee_rate, dec!(2.4));
        assert_eq!(result.care.employee.yearly, dec!(864.00));
        assert_eq!(result.care.employer.yearly, dec!(648.00));
        assert_eq!(result.pension.employee.yearly, dec!(3348.00));
        assert_eq!(result.unemployment.employee.yearly, dec!(468.00));
        assert_eq!(result.employee_total().monthly, dec!(646.50));
    }

    #[test]
    fn test_reduced_health_rate() {
        let rules = rules(AccountingYear::Y2025);
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::StatutoryReduced,
            ..create_test_profile()
        };
        let result = InsuranceCalculator::new(&rules).compute(&profile, dec!(36000));
        assert_eq!(result.health.employee_rate, dec!(8.25));
    }

    #[test]
    fn test_ceilings_cap_contributions() {
        let rules = rules(AccountingYear::Y2023);
        let calculator = InsuranceCalculator::new(&rules);
        let at_ceiling = calculator.compute(&create_test_profile(), dec!(87600));
        let above = calculator.compute(&create_test_profile(), dec!(250000));
        assert_eq!(at_ceiling.pension, above.pension);
        assert_eq!(at_ceiling.unemployment, above.unemployment);
        assert_eq!(at_ceiling.health, above.health);
        assert_eq!(above.pension.employee.yearly, dec!(8146.80));
    }

    #[test]
    fn test_east_ceiling_before_2025() {
        let rules = rules(AccountingYear::Y2023);
        let profile = TaxpayerProfile {
            state: FederalState::Thuringia,
            ..create_test_profile()
        };
        let result = InsuranceCalculator::new(&rules).compute(&profile, dec!(200000));
        // 85200 x 9.3%
        assert_eq!(result.pension.employee.yearly, dec!(7923.60));
    }

    #[test]
    fn test_mini_job_keeps_only_pension() {
        let rules = rules(AccountingYear::Y2022);
        let result = InsuranceCalculator::new(&rules).compute(&create_test_profile(), dec!(5399.99));
        assert_eq!(result.health, BranchContribution::none());
        assert_eq!(result.care, BranchContribution::none());
        assert_eq!(result.unemployment, BranchContribution::none());
        assert!(result.pension.employee.yearly > Decimal::ZERO);

        let regular = InsuranceCalculator::new(&rules).compute(&create_test_profile(), dec!(5400));
        assert!(regular.health.employee.yearly > Decimal::ZERO);
    }

    #[test]
    fn test_private_health_with_subsidy_capped() {
        let rules = rules(AccountingYear::Y2019);
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(900),
            employer_subsidy: true,
            ..create_test_profile()
        };
        let result = InsuranceCalculator::new(&rules).compute(&profile, dec!(60000));
        assert_eq!(result.health.employer.yearly, dec!(4219.92));
        assert_eq!(result.health.employer.monthly, dec!(351.66));
        assert_eq!(result.health.employee.yearly, dec!(6580.08));
        assert_eq!(result.care, BranchContribution::none());
    }

    #[test]
    fn test_private_health_without_subsidy() {
        let rules = rules(AccountingYear::Y2024);
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(400),
            ..create_test_profile()
        };
        let result = InsuranceCalculator::new(&rules).compute(&profile, dec!(60000));
        assert_eq!(result.health.employee.monthly, dec!(400.00));
        assert_eq!(result.health.employee_rate, dec!(8.00));
        assert_eq!(result.health.employer.yearly, Decimal::ZERO);
    }

    #[test]
    fn test_exempt_pension() {
        let rules = rules(AccountingYear::Y2024);
        let profile = TaxpayerProfile {
            pension_insurance: PensionInsurance::Exempt,
            ..create_test_profile()
        };
        let result = InsuranceCalculator::new(&rules).compute(&profile, dec!(36000));
        assert_eq!(result.pension, BranchContribution::none());
    }
}
