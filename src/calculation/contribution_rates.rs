//! Contribution rate setup for one computation.
//!
//! The precaution allowance works with employee contribution rates derived
//! from the year data and the taxpayer's insurance situation. The care rates
//! are shared with the insurance calculator.

use rust_decimal::Decimal;

use crate::config::YearRuleSet;
use crate::models::{AuditStep, TaxpayerProfile};

/// Care insurance rates in percent after the family adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareSplit {
    /// Employee share including surcharge or child discount.
    pub employee: Decimal,
    /// Employer share.
    pub employer: Decimal,
    /// Children beyond the first earning a discount.
    pub discounted_children: u32,
    /// Whether the childless surcharge was added.
    pub childless_surcharge: bool,
}

/// Number of children that reduce the employee care rate.
///
/// The first child earns nothing; each further child up to `max` does.
pub fn discounted_children(children: u32, max: u32) -> u32 {
    children.saturating_sub(1).min(max)
}

/// Determines the care insurance split for a taxpayer.
///
/// Saxony uses its own split of the same total rate. The childless surcharge
/// goes on top of the employee share; otherwise, in years with child
/// discount tiers, the employee share drops per discounted child.
pub fn care_split(rules: &YearRuleSet, profile: &TaxpayerProfile) -> CareSplit {
    let care = &rules.social_insurance.care;
    let (mut employee, employer) = if profile.state.is_saxony() {
        (care.saxony_employee_rate, care.saxony_employer_rate)
    } else {
        (care.employee_rate, care.employer_rate)
    };

    let surcharge = profile.owes_childless_surcharge(rules.year, care.childless_age_threshold);
    let mut discounted = 0;
    if surcharge {
        employee += care.childless_surcharge;
    } else if rules.supports_child_discount_tiers {
        discounted = discounted_children(profile.children, care.max_discounted_children);
        employee -= care.child_discount_step * Decimal::from(discounted);
    }

    CareSplit {
        employee,
        employer,
        discounted_children: discounted,
        childless_surcharge: surcharge,
    }
}

/// Contribution rates, as fractions, used by the precaution allowance.
#[derive(Debug, Clone)]
pub struct ContributionRates {
    /// Employee pension rate (RVSATZAN).
    pub pension_employee: Decimal,
    /// Employee health rate at the reduced rate plus half the add-on (KVSATZAN).
    pub health_employee: Decimal,
    /// Employer health rate at the average add-on (KVSATZAG).
    pub health_employer: Decimal,
    /// Employee care rate (PVSATZAN).
    pub care_employee: Decimal,
    /// Employer care rate (PVSATZAG).
    pub care_employer: Decimal,
    /// The audit step recording the setup.
    pub audit_step: AuditStep,
}

/// Derives the contribution rates of the precaution allowance.
///
/// Health uses the reduced general rate regardless of the sick-pay
/// entitlement; the add-on of the taxpayer's fund is split in half.
pub fn setup_contribution_rates(
    rules: &YearRuleSet,
    profile: &TaxpayerProfile,
    step_number: u32,
) -> ContributionRates {
    let si = &rules.social_insurance;
    let hundred = Decimal::ONE_HUNDRED;
    let half = |rate: Decimal| rate / Decimal::TWO / hundred;

    let pension_employee = half(si.pension_rate);
    let health_employee = half(profile.add_on_rate) + half(si.health_reduced_rate);
    let health_employer = half(si.average_add_on_rate) + half(si.health_reduced_rate);
    let care = care_split(rules, profile);
    let care_employee = care.employee / hundred;
    let care_employer = care.employer / hundred;

    let audit_step = AuditStep {
        step_number,
        rule_id: "contribution_rates".to_string(),
        rule_name: "Contribution Rate Setup".to_string(),
        clause_ref: "§ 39b Abs. 2 Satz 5 Nr. 3 EStG".to_string(),
        input: serde_json::json!({
            "state": profile.state.name(),
            "children": profile.children,
            "add_on_rate": profile.add_on_rate.to_string(),
        }),
        output: serde_json::json!({
            "pension_employee": pension_employee.normalize().to_string(),
            "health_employee": health_employee.normalize().to_string(),
            "health_employer": health_employer.normalize().to_string(),
            "care_employee": care_employee.normalize().to_string(),
            "care_employer": care_employer.normalize().to_string(),
        }),
        reasoning: format!(
            "Care employee rate {}% (childless surcharge: {}, discounted children: {})",
            care.employee.normalize(),
            care.childless_surcharge,
            care.discounted_children
        ),
    };

    ContributionRates {
        pension_employee,
        health_employee,
        health_employer,
        care_employee,
        care_employer,
        audit_step,
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

    fn create_test_profile(state: FederalState, children: u32) -> TaxpayerProfile {
        TaxpayerProfile {
            children,
            ..TaxpayerProfile::new(TaxClass::I, state, 1990)
        }
    }

    #[test]
    fn test_discounted_children_caps() {
        assert_eq!(discounted_children(0, 4), 0);
        assert_eq!(discounted_children(1, 4), 0);
        assert_eq!(discounted_children(3, 4), 2);
        assert_eq!(discounted_children(9, 4), 4);
    }

    #[test]
    fn test_care_split_childless_2025() {
        let rules = rules(AccountingYear::Y2025);
        let split = care_split(&rules, &create_test_profile(FederalState::Hesse, 0));
        assert_eq!(split.employee, dec!(2.4));
        assert_eq!(split.employer, dec!(1.8));
        assert!(split.childless_surcharge);
    }

    #[test]
    fn test_care_split_saxony_2025() {
        let rules = rules(AccountingYear::Y2025);
        let parent = care_split(&rules, &create_test_profile(FederalState::Saxony, 1));
        assert_eq!(parent.employee, dec!(2.3));
        assert_eq!(parent.employer, dec!(1.3));

        let childless = care_split(&rules, &create_test_profile(FederalState::Saxony, 0));
        assert_eq!(childless.employee, dec!(2.9));
    }

    #[test]
    fn test_child_discount_tiers_from_2024() {
        let rules_2024 = rules(AccountingYear::Y2024);
        let split = care_split(&rules_2024, &create_test_profile(FederalState::Hesse, 3));
        assert_eq!(split.employee, dec!(1.2));
        assert_eq!(split.discounted_children, 2);

        let many = care_split(&rules_2024, &create_test_profile(FederalState::Hesse, 7));
        assert_eq!(many.employee, dec!(0.7));

        let rules_2023 = rules(AccountingYear::Y2023);
        let before = care_split(&rules_2023, &create_test_profile(FederalState::Hesse, 3));
        assert_eq!(before.employee, dec!(1.525));
        assert_eq!(before.discounted_children, 0);
    }

    #[test]
    fn test_setup_contribution_rates_2023() {
        let rules = rules(AccountingYear::Y2023);
        let profile = TaxpayerProfile {
            add_on_rate: dec!(1.6),
            ..create_test_profile(FederalState::Hesse, 0)
        };
        let rates = setup_contribution_rates(&rules, &profile, 1);
        assert_eq!(rates.pension_employee, dec!(0.093));
        assert_eq!(rates.health_employee, dec!(0.078));
        assert_eq!(rates.health_employer, dec!(0.078));
        assert_eq!(rates.care_employee, dec!(0.01875));
        assert_eq!(rates.audit_step.rule_id, "contribution_rates");
    }
}
