//! Precaution-expense allowance (Vorsorgepauschale).
//!
//! The allowance is computed twice: once from the statutory minimum (the
//! pension part plus 12% of wages, capped) and once from the pension part
//! plus the actual health and care contributions. The larger of the two is
//! deducted. Both paths are always evaluated.

use rust_decimal::Decimal;

use super::contribution_rates::ContributionRates;
use super::rounding::{round_down, round_up};
use crate::config::YearRuleSet;
use crate::models::{AuditStep, PensionInsurance, TaxClass, TaxpayerProfile};

/// Both paths of the precaution allowance and the amount deducted.
#[derive(Debug, Clone)]
pub struct PrecautionAllowance {
    /// Deductible pension contributions (VSP1).
    pub pension_part: Decimal,
    /// Minimum allowance on wages (VSP2).
    pub minimum_lump_sum: Decimal,
    /// Pension part plus minimum allowance, rounded up (VSPN).
    pub minimum_path: Decimal,
    /// Health and care contributions (VSP3).
    pub insurance_part: Decimal,
    /// Pension part plus health and care, rounded up (before comparison).
    pub contribution_path: Decimal,
    /// The allowance deducted (VSP).
    pub allowance: Decimal,
    /// The audit step recording the comparison.
    pub audit_step: AuditStep,
}

impl PrecautionAllowance {
    /// Private premiums deductible for the year (VKV).
    ///
    /// Zero for statutorily insured taxpayers.
    pub fn deductible_private_insurance(&self, profile: &TaxpayerProfile) -> Decimal {
        if profile.is_privately_insured() {
            self.minimum_lump_sum.max(self.insurance_part)
        } else {
            Decimal::ZERO
        }
    }
}

/// Computes the precaution allowance for an annual wage.
///
/// # Arguments
///
/// * `rules` - The year's rule set
/// * `profile` - The taxpayer
/// * `rates` - Contribution rates from the rate setup
/// * `annual_wage` - The precaution base (full annual wage)
/// * `step_number` - The step number for audit trail sequencing
pub fn precaution_allowance(
    rules: &YearRuleSet,
    profile: &TaxpayerProfile,
    rates: &ContributionRates,
    annual_wage: Decimal,
    step_number: u32,
) -> PrecautionAllowance {
    let precaution = &rules.precaution;
    let mut base = annual_wage;

    let pension_part = match profile.pension_insurance {
        PensionInsurance::Exempt => Decimal::ZERO,
        PensionInsurance::Statutory => {
            base = base.min(rules.pension_ceiling(profile.state.is_east()));
            let deductible = round_down(precaution.pension_deductible_share * base, 2);
            round_down(deductible * rates.pension_employee, 2)
        }
    };

    let cap = if profile.tax_class == TaxClass::III {
        precaution.lump_sum_cap_joint
    } else {
        precaution.lump_sum_cap
    };
    let minimum_lump_sum = round_down(base * precaution.lump_sum_rate, 2).min(cap);
    let minimum_path = round_up(pension_part + minimum_lump_sum, 0);

    base = base.min(rules.social_insurance.ceilings.health);
    let insurance_part = if profile.is_privately_insured() {
        if profile.tax_class == TaxClass::VI {
            Decimal::ZERO
        } else {
            let premiums = round_down(profile.private_contribution * Decimal::from(12), 2);
            if profile.employer_subsidy {
                round_down(
                    premiums - base * (rates.health_employer + rates.care_employer),
                    2,
                )
            } else {
                premiums
            }
        }
    } else {
        round_down(base * (rates.health_employee + rates.care_employee), 2)
    };

    let contribution_path = round_up(insurance_part + pension_part, 0);
    let minimum_wins = minimum_path > contribution_path;
    let allowance = if minimum_wins {
        round_down(minimum_path, 2)
    } else {
        contribution_path
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "precaution_allowance".to_string(),
        rule_name: "Precaution Allowance".to_string(),
        clause_ref: "§ 39b Abs. 2 Satz 5 Nr. 3 EStG".to_string(),
        input: serde_json::json!({
            "annual_wage": annual_wage.to_string(),
            "private_insurance": profile.is_privately_insured(),
            "pension_insurance": format!("{:?}", profile.pension_insurance),
        }),
        output: serde_json::json!({
            "pension_part": pension_part.to_string(),
            "minimum_lump_sum": minimum_lump_sum.to_string(),
            "insurance_part": insurance_part.to_string(),
            "allowance": allowance.to_string(),
        }),
        reasoning: format!(
            "Minimum path {} vs contribution path {}: {} applied",
            minimum_path,
            contribution_path,
            if minimum_wins { "minimum" } else { "contributions" }
        ),
    };

    PrecautionAllowance {
        pension_part,
        minimum_lump_sum,
        minimum_path,
        insurance_part,
        contribution_path,
        allowance,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::contribution_rates::setup_contribution_rates;
    use crate::config::RuleBook;
    use crate::models::{AccountingYear, FederalState, HealthInsurance};
    use rust_decimal_macros::dec;

    fn rules(year: AccountingYear) -> YearRuleSet {
        RuleBook::builtin().unwrap().get(year).unwrap().clone()
    }

    fn create_test_profile() -> TaxpayerProfile {
        TaxpayerProfile {
            add_on_rate: dec!(1.6),
            ..TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990)
        }
    }

    fn compute(year: AccountingYear, profile: &TaxpayerProfile, wage: Decimal) -> PrecautionAllowance {
        let rules = rules(year);
        let rates = setup_contribution_rates(&rules, profile, 1);
        precaution_allowance(&rules, profile, &rates, wage, 2)
    }

    #[test]
    fn test_statutory_2023_monthly_3000() {
        let allowance = compute(AccountingYear::Y2023, &create_test_profile(), dec!(36000));
        // 36000 x 0.093 = 3348; 36000 x (0.078 + 0.01875) = 3483
        assert_eq!(allowance.pension_part, dec!(3348));
        assert_eq!(allowance.insurance_part, dec!(3483));
        assert_eq!(allowance.allowance, dec!(6831));
    }

    #[test]
    fn test_pension_part_uses_deductible_share_2019() {
        let profile = TaxpayerProfile {
            add_on_rate: dec!(0.9),
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2019, &profile, dec!(36000));
        // 36000 x 0.76 = 27360; x 0.093 = 2544.48
        assert_eq!(allowance.pension_part, dec!(2544.48));
        // 36000 x (0.0745 + 0.01775) = 3321
        assert_eq!(allowance.insurance_part, dec!(3321));
        assert_eq!(allowance.allowance, dec!(5866));
    }

    #[test]
    fn test_minimum_path_wins_for_cheap_private_insurance() {
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(50),
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2023, &profile, dec!(36000));
        // minimum: 3348 + 1900 = 5248 vs contributions 3348 + 600 = 3948
        assert_eq!(allowance.minimum_path, dec!(5248));
        assert_eq!(allowance.allowance, dec!(5248));
        assert_eq!(allowance.deductible_private_insurance(&profile), dec!(1900));
    }

    #[test]
    fn test_employer_subsidy_reduces_private_part() {
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(600),
            employer_subsidy: true,
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2023, &profile, dec!(36000));
        // 7200 - 36000 x (0.078 + 0.01525) = 7200 - 3357 = 3843
        assert_eq!(allowance.insurance_part, dec!(3843));
    }

    #[test]
    fn test_exempt_pension_keeps_minimum_path() {
        let profile = TaxpayerProfile {
            pension_insurance: PensionInsurance::Exempt,
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2023, &profile, dec!(120000));
        assert_eq!(allowance.pension_part, Decimal::ZERO);
        assert_eq!(allowance.minimum_lump_sum, dec!(1900));
        // health ceiling 59850 x 0.09675 = 5790.48
        assert_eq!(allowance.insurance_part, dec!(5790.48));
        assert_eq!(allowance.allowance, dec!(5791));
    }

    #[test]
    fn test_class_six_private_has_no_insurance_part() {
        let profile = TaxpayerProfile {
            tax_class: TaxClass::VI,
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(600),
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2023, &profile, dec!(36000));
        assert_eq!(allowance.insurance_part, Decimal::ZERO);
    }

    #[test]
    fn test_joint_cap_for_class_three() {
        let profile = TaxpayerProfile {
            tax_class: TaxClass::III,
            ..create_test_profile()
        };
        let allowance = compute(AccountingYear::Y2023, &profile, dec!(30000));
        assert_eq!(allowance.minimum_lump_sum, dec!(3000));
    }
}
