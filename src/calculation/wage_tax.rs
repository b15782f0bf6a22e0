//! The wage-tax engine.
//!
//! [`WageTaxEngine`] runs the statutory withholding procedure for one
//! accounting year. The procedure is the same for every year; all year
//! differences live in the [`YearRuleSet`] the engine is built from.
//!
//! The stages run in a fixed order:
//!
//! 1. contribution rate setup
//! 2. annualization of wage, pension income, allowance and addback
//! 3. pension relief and age relief
//! 4. net annual wage
//! 5. fixed deductions
//! 6. precaution allowance and taxable income
//! 7. tariff, or the class V/VI procedure
//! 8. factor and apportionment to the pay period
//! 9. second run including child allowances, for surcharge and church tax
//! 10. solidarity surcharge
//! 11. church tax
//! 12. other payments

use rust_decimal::Decimal;
use tracing::debug;

use super::allowances::{NetAnnualWage, fixed_deductions, net_annual_wage};
use super::annualization::{annualize, apportion};
use super::contribution_rates::{ContributionRates, setup_contribution_rates};
use super::other_payments::other_payments_tax;
use super::precaution_allowance::{PrecautionAllowance, precaution_allowance};
use super::relief::{age_relief, pension_relief};
use super::rounding::{floor_at_zero, round_down};
use super::surcharge::{church_tax, solidarity_surcharge};
use super::tariff::{class_five_six_tax, income_tax_tariff, per_unit_income, tariff_zone};
use crate::config::YearRuleSet;
use crate::error::EngineResult;
use crate::models::{
    AccountingYear, AuditTrace, GrossWage, TaxClass, TaxFigures, TaxpayerProfile, WageTaxResult,
};

/// One pass of precaution allowance, taxable income and tariff.
struct TariffRun {
    tax: Decimal,
    taxable_income: Decimal,
    precaution: PrecautionAllowance,
}

/// The withholding procedure for one accounting year.
///
/// The engine borrows its rule set and holds no other state, so one engine
/// can serve any number of computations, also from several threads.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::WageTaxEngine;
/// use wage_tax_engine::config::RuleBook;
/// use wage_tax_engine::models::{
///     AccountingYear, FederalState, GrossWage, PayPeriod, TaxClass, TaxpayerProfile,
/// };
///
/// let book = RuleBook::builtin().unwrap();
/// let engine = WageTaxEngine::new(book.get(AccountingYear::Y2023).unwrap());
/// let profile = TaxpayerProfile {
///     add_on_rate: dec!(1.6),
///     ..TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990)
/// };
///
/// let result = engine
///     .compute(&profile, &GrossWage::new(dec!(3000), PayPeriod::Month))
///     .unwrap();
/// assert_eq!(result.annual.wage_tax, dec!(4092));
/// assert_eq!(result.period.wage_tax, dec!(341.00));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WageTaxEngine<'a> {
    rules: &'a YearRuleSet,
}

impl<'a> WageTaxEngine<'a> {
    /// Creates an engine for a validated rule set.
    pub fn new(rules: &'a YearRuleSet) -> Self {
        Self { rules }
    }

    /// The rule set the engine applies.
    pub fn rules(&self) -> &'a YearRuleSet {
        self.rules
    }

    /// Computes wage tax, solidarity surcharge and church tax.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::UnsupportedYear`] if the rule set
    /// belongs to an unknown year, and
    /// [`crate::error::EngineError::UnsupportedOperation`] if the profile
    /// carries other payments.
    pub fn compute(&self, profile: &TaxpayerProfile, wage: &GrossWage) -> EngineResult<WageTaxResult> {
        let rules = self.rules;
        let year = AccountingYear::try_from(rules.year)?;
        let period = wage.period;
        let mut trace = AuditTrace::default();

        if profile.factor.is_some() && profile.tax_class != TaxClass::IV {
            trace.warn(
                "factor_ignored",
                format!(
                    "Factor only applies to tax class IV; ignored for class {}",
                    profile.tax_class.number()
                ),
            );
        }
        if !profile.is_privately_insured() && profile.private_contribution > Decimal::ZERO {
            trace.warn(
                "private_contribution_ignored",
                "Private insurance premium ignored for statutorily insured taxpayer",
            );
        }

        // Stage 1
        let rates = setup_contribution_rates(rules, profile, next_step(&trace));
        trace.steps.push(rates.audit_step.clone());

        // Stage 2
        let annual_wage = wage.annualized();
        let annual_pension = profile
            .pension_income
            .as_ref()
            .map(|pension| annualize(pension.period_amount, period))
            .unwrap_or(Decimal::ZERO);
        let annual_allowance = annualize(profile.allowance, period);
        let annual_addback = annualize(profile.addback, period);
        trace.record(
            "annualization",
            "Annualization",
            "§ 39b Abs. 2 Satz 2 EStG",
            serde_json::json!({
                "wage": wage.amount.to_string(),
                "pay_period": period.code(),
                "allowance": profile.allowance.to_string(),
                "addback": profile.addback.to_string(),
            }),
            serde_json::json!({
                "annual_wage": annual_wage.to_string(),
                "annual_pension": annual_pension.to_string(),
                "annual_allowance": annual_allowance.to_string(),
                "annual_addback": annual_addback.to_string(),
            }),
            format!("{} per {:?} = {} per year", wage.amount, period, annual_wage),
        );
        debug!(year = %year, annual_wage = %annual_wage, "annualized wage");

        // Stage 3
        let pension = pension_relief(
            &rules.relief_tables,
            profile.pension_income.as_ref(),
            annual_pension,
            period,
            next_step(&trace),
        );
        trace.steps.push(pension.audit_step.clone());
        let age_start = profile
            .has_age_relief(rules.year)
            .then(|| profile.age_relief_start_year());
        let age = age_relief(
            &rules.relief_tables,
            age_start,
            annual_wage,
            annual_pension,
            next_step(&trace),
        );
        trace.steps.push(age.audit_step.clone());
        debug!(pension_relief = %pension.allowance, age_relief = %age.amount, "reliefs");

        // Stage 4
        let net = net_annual_wage(
            annual_wage,
            annual_pension,
            pension.allowance,
            age.amount,
            annual_allowance,
            annual_addback,
        );
        trace.record(
            "net_annual_wage",
            "Net Annual Wage",
            "§ 39b Abs. 2 Satz 3 EStG",
            serde_json::json!({
                "annual_wage": annual_wage.to_string(),
                "pension_relief": pension.allowance.to_string(),
                "age_relief": age.amount.to_string(),
                "annual_allowance": annual_allowance.to_string(),
                "annual_addback": annual_addback.to_string(),
            }),
            serde_json::json!({
                "taxable_wage": net.taxable_wage.to_string(),
                "net_pension": net.net_pension.to_string(),
            }),
            format!(
                "{} - {} - {} - {} + {} = {}",
                annual_wage,
                pension.allowance,
                age.amount,
                annual_allowance,
                annual_addback,
                net.taxable_wage
            ),
        );

        // Stage 5
        let deductions = fixed_deductions(
            &rules.income_tax,
            profile.tax_class,
            profile.child_allowances,
            &net,
            pension.supplement,
            next_step(&trace),
        );
        trace.steps.push(deductions.audit_step.clone());
        let splitting_factor = deductions.splitting_factor;

        // Stages 6 and 7
        let first = self.tariff_run(profile, &rates, &net, deductions.total, splitting_factor, &mut trace);

        // Stage 8
        let factor = profile.tax_factor();
        let annual_wage_tax = round_down(first.tax * factor, 0);
        let period_wage_tax = apportion(annual_wage_tax, period);
        trace.record(
            "apportionment",
            "Apportionment",
            "§ 39b Abs. 2 Satz 9 EStG",
            serde_json::json!({
                "tariff_tax": first.tax.to_string(),
                "factor": factor.to_string(),
                "pay_period": period.code(),
            }),
            serde_json::json!({
                "annual_wage_tax": annual_wage_tax.to_string(),
                "period_wage_tax": period_wage_tax.to_string(),
            }),
            format!(
                "{} x {} = {} per year, {} per {:?}",
                first.tax,
                factor.normalize(),
                annual_wage_tax,
                period_wage_tax,
                period
            ),
        );
        debug!(annual_wage_tax = %annual_wage_tax, period_wage_tax = %period_wage_tax, "wage tax");

        // Stage 9
        let surcharge_base = if profile.child_allowances > Decimal::ZERO {
            let with_children = self.tariff_run(
                profile,
                &rates,
                &net,
                deductions.total + deductions.child_allowance,
                splitting_factor,
                &mut trace,
            );
            let base = round_down(with_children.tax * factor, 0);
            trace.record(
                "child_allowance_base",
                "Surcharge Base After Child Allowances",
                "§ 51a Abs. 2a EStG",
                serde_json::json!({
                    "child_allowances": profile.child_allowances.to_string(),
                    "child_allowance": deductions.child_allowance.to_string(),
                }),
                serde_json::json!({ "base_tax": base.to_string() }),
                format!(
                    "Tax recomputed with child allowance {}: {}",
                    deductions.child_allowance, base
                ),
            );
            base
        } else {
            annual_wage_tax
        };

        // Stage 10
        let solidarity = solidarity_surcharge(
            &rules.solidarity,
            surcharge_base,
            splitting_factor,
            next_step(&trace),
        );
        trace.steps.push(solidarity.audit_step.clone());
        let period_solidarity = apportion(solidarity.annual, period);

        // Stage 11
        let period_base = apportion(surcharge_base, period);
        let (annual_church, period_church) = if profile.church_member {
            let rate = profile.state.church_tax_rate();
            let annual = TaxFigures {
                church_tax_base: surcharge_base,
                church_tax: church_tax(surcharge_base, rate),
                ..TaxFigures::default()
            };
            let period_figures = TaxFigures {
                church_tax_base: period_base,
                church_tax: church_tax(period_base, rate),
                ..TaxFigures::default()
            };
            trace.record(
                "church_tax",
                "Church Tax",
                "§ 51a EStG",
                serde_json::json!({
                    "base_tax": surcharge_base.to_string(),
                    "state": profile.state.name(),
                }),
                serde_json::json!({
                    "annual": annual.church_tax.to_string(),
                    "period": period_figures.church_tax.to_string(),
                }),
                format!(
                    "{} x {}% = {} per year",
                    surcharge_base,
                    rate,
                    annual.church_tax
                ),
            );
            (annual, period_figures)
        } else {
            trace.record(
                "church_tax",
                "Church Tax",
                "§ 51a EStG",
                serde_json::json!({ "church_member": false }),
                serde_json::json!({ "annual": "0", "period": "0" }),
                "Not a church member, no church tax".to_string(),
            );
            (
                TaxFigures {
                    church_tax_base: surcharge_base,
                    ..TaxFigures::default()
                },
                TaxFigures {
                    church_tax_base: period_base,
                    ..TaxFigures::default()
                },
            )
        };

        // Stage 12
        let other_payments = other_payments_tax(profile.other_payments)?;
        trace.record(
            "other_payments",
            "Other Payments",
            "§ 39b Abs. 3 EStG",
            serde_json::json!({ "other_payments": profile.other_payments.to_string() }),
            serde_json::json!({ "tax": other_payments.total().to_string() }),
            "No other payments in the pay period".to_string(),
        );

        let deductible_private_insurance =
            apportion(first.precaution.deductible_private_insurance(profile), period);
        let consumed_allowances =
            deductions.employee_lump_sum + pension.allowance + deductions.pension_supplement;
        let income_above_basic_allowance =
            floor_at_zero(first.taxable_income - rules.income_tax.basic_allowance);

        Ok(WageTaxResult {
            year,
            pay_period: period,
            annual_wage,
            annual: TaxFigures {
                wage_tax: annual_wage_tax,
                solidarity_surcharge: solidarity.annual,
                ..annual_church
            },
            period: TaxFigures {
                wage_tax: period_wage_tax,
                solidarity_surcharge: period_solidarity,
                ..period_church
            },
            other_payments,
            taxable_income: first.taxable_income,
            precaution_allowance: first.precaution.allowance,
            deductible_private_insurance,
            consumed_allowances,
            income_above_basic_allowance,
            audit_trace: trace,
        })
    }

    fn tariff_run(
        &self,
        profile: &TaxpayerProfile,
        rates: &ContributionRates,
        net: &NetAnnualWage,
        deductions: Decimal,
        splitting_factor: Decimal,
        trace: &mut AuditTrace,
    ) -> TariffRun {
        let income_tax = &self.rules.income_tax;
        let precaution = precaution_allowance(
            self.rules,
            profile,
            rates,
            net.precaution_base,
            next_step(trace),
        );
        trace.steps.push(precaution.audit_step.clone());

        let mut taxable_income =
            round_down(net.taxable_wage - deductions - precaution.allowance, 2);
        if taxable_income < Decimal::ONE {
            taxable_income = Decimal::ZERO;
        }
        let income = per_unit_income(taxable_income, splitting_factor);

        let (tax, reasoning) = if profile.tax_class.uses_class_five_six_procedure() {
            let tax = class_five_six_tax(income_tax, income);
            (tax, format!("Class V/VI procedure on {} = {}", income, tax))
        } else {
            let tax = income_tax_tariff(income_tax, income, splitting_factor);
            let zone = tariff_zone(income_tax, income);
            (
                tax,
                format!("{:?} zone on {} x {} = {}", zone, income, splitting_factor, tax),
            )
        };

        trace.record(
            "tariff",
            "Income Tax Tariff",
            "§ 32a EStG",
            serde_json::json!({
                "taxable_wage": net.taxable_wage.to_string(),
                "deductions": deductions.to_string(),
                "precaution_allowance": precaution.allowance.to_string(),
                "splitting_factor": splitting_factor.to_string(),
            }),
            serde_json::json!({
                "taxable_income": taxable_income.to_string(),
                "tax": tax.to_string(),
            }),
            reasoning,
        );
        debug!(taxable_income = %taxable_income, tax = %tax, "tariff");

        TariffRun {
            tax,
            taxable_income,
            precaution,
        }
    }
}

fn next_step(trace: &AuditTrace) -> u32 {
    trace.steps.len() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleBook;
    use crate::error::EngineError;
    use crate::models::{FederalState, HealthInsurance, PayPeriod, PensionIncome, PensionInsurance};
    use rust_decimal_macros::dec;

    fn book() -> RuleBook {
        RuleBook::builtin().unwrap()
    }

    fn create_test_profile(class: TaxClass, add_on_rate: Decimal) -> TaxpayerProfile {
        TaxpayerProfile {
            add_on_rate,
            ..TaxpayerProfile::new(class, FederalState::Hesse, 1990)
        }
    }

    fn compute(
        year: AccountingYear,
        profile: &TaxpayerProfile,
        amount: Decimal,
        period: PayPeriod,
    ) -> WageTaxResult {
        let book = book();
        WageTaxEngine::new(book.get(year).unwrap())
            .compute(profile, &GrossWage::new(amount, period))
            .unwrap()
    }

    #[test]
    fn test_class_one_2023_monthly_3000() {
        let profile = create_test_profile(TaxClass::I, dec!(1.6));
        let result = compute(AccountingYear::Y2023, &profile, dec!(3000), PayPeriod::Month);
        assert_eq!(result.annual.wage_tax, dec!(4092));
        assert_eq!(result.period.wage_tax, dec!(341.00));
        assert_eq!(result.taxable_income, dec!(27903));
        assert_eq!(result.precaution_allowance, dec!(6831));
        assert_eq!(result.annual.solidarity_surcharge, Decimal::ZERO);
    }

    #[test]
    fn test_class_one_2019_has_surcharge() {
        let profile = create_test_profile(TaxClass::I, dec!(0.9));
        let result = compute(AccountingYear::Y2019, &profile, dec!(3000), PayPeriod::Month);
        assert_eq!(result.annual.wage_tax, dec!(4999));
        assert_eq!(result.period.wage_tax, dec!(416.58));
        assert_eq!(result.annual.solidarity_surcharge, dec!(274.94));
        assert_eq!(result.period.solidarity_surcharge, dec!(22.91));
    }

    #[test]
    fn test_2019_precaution_uses_phased_pension_share() {
        let profile = create_test_profile(TaxClass::I, dec!(0.9));
        let result = compute(AccountingYear::Y2019, &profile, dec!(3000), PayPeriod::Month);
        // 76 % of the pension contribution is deductible in 2019
        assert_eq!(result.precaution_allowance, dec!(5866));
        assert_eq!(result.taxable_income, dec!(29098));
    }

    #[test]
    fn test_class_one_2025_monthly_3000() {
        let profile = create_test_profile(TaxClass::I, dec!(2.5));
        let result = compute(AccountingYear::Y2025, &profile, dec!(3000), PayPeriod::Month);
        assert_eq!(result.annual.wage_tax, dec!(3618));
        assert_eq!(result.period.wage_tax, dec!(301.50));
    }

    #[test]
    fn test_yearly_and_monthly_wage_give_same_annual_tax() {
        let profile = create_test_profile(TaxClass::I, dec!(1.7));
        let monthly = compute(AccountingYear::Y2024, &profile, dec!(3000), PayPeriod::Month);
        let yearly = compute(AccountingYear::Y2024, &profile, dec!(36000), PayPeriod::Year);
        assert_eq!(monthly.annual, yearly.annual);
        assert_eq!(monthly.period.wage_tax, dec!(317.08));
        assert_eq!(yearly.period.wage_tax, dec!(3805));
    }

    #[test]
    fn test_church_tax_on_period_base() {
        let profile = TaxpayerProfile {
            church_member: true,
            ..create_test_profile(TaxClass::I, dec!(1.6))
        };
        let result = compute(AccountingYear::Y2023, &profile, dec!(3000), PayPeriod::Month);
        assert_eq!(result.period.church_tax_base, dec!(341.00));
        assert_eq!(result.period.church_tax, dec!(30.69));
        assert_eq!(result.annual.church_tax, dec!(368.28));
    }

    #[test]
    fn test_child_allowance_lowers_church_base_only() {
        let without = TaxpayerProfile {
            church_member: true,
            children: 1,
            ..create_test_profile(TaxClass::I, dec!(1.6))
        };
        let with = TaxpayerProfile {
            child_allowances: dec!(1),
            ..without.clone()
        };
        let base = compute(AccountingYear::Y2023, &without, dec!(4000), PayPeriod::Month);
        let reduced = compute(AccountingYear::Y2023, &with, dec!(4000), PayPeriod::Month);
        assert_eq!(base.annual.wage_tax, reduced.annual.wage_tax);
        assert!(reduced.annual.church_tax_base < base.annual.church_tax_base);
        assert!(reduced.annual.church_tax < base.annual.church_tax);
    }

    #[test]
    fn test_class_six_withholds_more_than_class_one() {
        let class_one = compute(
            AccountingYear::Y2023,
            &create_test_profile(TaxClass::I, dec!(1.6)),
            dec!(3000),
            PayPeriod::Month,
        );
        let class_six = compute(
            AccountingYear::Y2023,
            &create_test_profile(TaxClass::VI, dec!(1.6)),
            dec!(3000),
            PayPeriod::Month,
        );
        assert!(class_six.annual.wage_tax > class_one.annual.wage_tax);
    }

    #[test]
    fn test_factor_reduces_class_four_tax() {
        let plain = create_test_profile(TaxClass::IV, dec!(1.6));
        let with_factor = TaxpayerProfile {
            factor: Some(dec!(0.9)),
            ..plain.clone()
        };
        let base = compute(AccountingYear::Y2023, &plain, dec!(3000), PayPeriod::Month);
        let reduced = compute(AccountingYear::Y2023, &with_factor, dec!(3000), PayPeriod::Month);
        assert_eq!(base.annual.wage_tax, dec!(4092));
        assert_eq!(reduced.annual.wage_tax, dec!(3682));
    }

    #[test]
    fn test_factor_outside_class_four_warns() {
        let profile = TaxpayerProfile {
            factor: Some(dec!(0.9)),
            ..create_test_profile(TaxClass::I, dec!(1.6))
        };
        let result = compute(AccountingYear::Y2023, &profile, dec!(3000), PayPeriod::Month);
        assert_eq!(result.annual.wage_tax, dec!(4092));
        assert_eq!(result.audit_trace.warnings[0].code, "factor_ignored");
    }

    #[test]
    fn test_low_wage_has_no_tax() {
        let profile = create_test_profile(TaxClass::I, dec!(1.6));
        let result = compute(AccountingYear::Y2023, &profile, dec!(1000), PayPeriod::Month);
        assert_eq!(result.annual.total(), Decimal::ZERO);
        assert_eq!(result.income_above_basic_allowance, Decimal::ZERO);
    }

    #[test]
    fn test_other_payments_are_rejected() {
        let profile = TaxpayerProfile {
            other_payments: dec!(2000),
            ..create_test_profile(TaxClass::I, dec!(1.6))
        };
        let book = book();
        let result = WageTaxEngine::new(book.get(AccountingYear::Y2023).unwrap())
            .compute(&profile, &GrossWage::new(dec!(3000), PayPeriod::Month));
        assert!(matches!(result, Err(EngineError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_private_insurance_deductible_amount() {
        let profile = TaxpayerProfile {
            health_insurance: HealthInsurance::Private,
            private_contribution: dec!(500),
            ..create_test_profile(TaxClass::I, Decimal::ZERO)
        };
        let result = compute(AccountingYear::Y2023, &profile, dec!(5000), PayPeriod::Month);
        assert_eq!(result.deductible_private_insurance, dec!(500.00));
    }

    #[test]
    fn test_pension_income_consumes_allowances() {
        let profile = TaxpayerProfile {
            birth_year: 1950,
            pension_insurance: PensionInsurance::Exempt,
            pension_income: Some(PensionIncome {
                period_amount: dec!(2000),
                monthly_amount: dec!(2000),
                special_payments: Decimal::ZERO,
                start_year: 2015,
                months_paid: 12,
            }),
            ..create_test_profile(TaxClass::I, dec!(1.6))
        };
        let result = compute(AccountingYear::Y2023, &profile, dec!(2000), PayPeriod::Month);
        // 2015: 24%, max 1800, supplement 540; lump sum 102
        assert_eq!(result.consumed_allowances, dec!(2442));
    }

    #[test]
    fn test_audit_trace_is_sequential() {
        let profile = TaxpayerProfile {
            child_allowances: dec!(1),
            children: 1,
            ..create_test_profile(TaxClass::III, dec!(1.6))
        };
        let result = compute(AccountingYear::Y2024, &profile, dec!(5000), PayPeriod::Month);
        for (index, step) in result.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number as usize, index + 1);
        }
        let tariff_runs = result
            .audit_trace
            .steps
            .iter()
            .filter(|s| s.rule_id == "tariff")
            .count();
        assert_eq!(tariff_runs, 2);
    }
}
