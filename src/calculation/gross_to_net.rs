//! Gross-to-net orchestration.
//!
//! [`GrossToNetOrchestrator`] runs the wage-tax engine and the insurance
//! calculator on the same wage and folds their results, together with the
//! employer levies, into a [`NetWageReport`].

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::annualization::apportion;
use super::insurance::InsuranceCalculator;
use super::rounding::percent_of;
use super::surcharge::church_tax;
use super::wage_tax::WageTaxEngine;
use crate::config::{RuleBook, YearRuleSet};
use crate::error::EngineResult;
use crate::models::{
    EmployerLevies, GrossToNetInput, GrossWage, LevyAmounts, NetWageReport, PayPeriod,
    PeriodAmount, TaxpayerProfile, WageTaxResult,
};

/// Produces gross-to-net reports from a shared rule book.
///
/// Cloning is cheap; clones share the rule book.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::GrossToNetOrchestrator;
/// use wage_tax_engine::models::{
///     AccountingYear, FederalState, GrossToNetInput, GrossWage, PayPeriod, TaxClass,
///     TaxpayerProfile,
/// };
///
/// let orchestrator = GrossToNetOrchestrator::builtin().unwrap();
/// let input = GrossToNetInput {
///     year: AccountingYear::Y2023,
///     profile: TaxpayerProfile {
///         add_on_rate: dec!(1.6),
///         ..TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990)
///     },
///     wage: GrossWage::new(dec!(3000), PayPeriod::Month),
///     levies: None,
/// };
///
/// let report = orchestrator.compute(&input).unwrap();
/// assert_eq!(report.wage_tax.monthly, dec!(341.00));
/// ```
#[derive(Debug, Clone)]
pub struct GrossToNetOrchestrator {
    rule_book: Arc<RuleBook>,
}

impl GrossToNetOrchestrator {
    /// Creates an orchestrator over a rule book.
    pub fn new(rule_book: RuleBook) -> Self {
        Self {
            rule_book: Arc::new(rule_book),
        }
    }

    /// Creates an orchestrator over the rule data compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Ok(Self::new(RuleBook::builtin()?))
    }

    /// Returns the rule book.
    pub fn rule_book(&self) -> &RuleBook {
        &self.rule_book
    }

    /// Computes the full gross-to-net report.
    ///
    /// # Errors
    ///
    /// Fails if the rule book has no rules for the year, or if the engine
    /// rejects the profile.
    pub fn compute(&self, input: &GrossToNetInput) -> EngineResult<NetWageReport> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            year = %input.year,
            tax_class = input.profile.tax_class.number(),
            "Processing gross-to-net calculation"
        );

        let rules = self.rule_book.get(input.year)?;
        let tax = WageTaxEngine::new(rules).compute(&input.profile, &input.wage)?;
        let annual_gross = tax.annual_wage;
        let insurance = InsuranceCalculator::new(rules).compute(&input.profile, annual_gross);

        let gross = PeriodAmount::new(apportion(annual_gross, PayPeriod::Month), annual_gross);
        let church_tax_rate = if input.profile.church_member {
            input.profile.state.church_tax_rate()
        } else {
            Decimal::ZERO
        };
        let wage_tax = PeriodAmount::new(
            apportion(tax.annual.wage_tax, PayPeriod::Month),
            tax.annual.wage_tax,
        );
        let solidarity_surcharge = PeriodAmount::new(
            apportion(tax.annual.solidarity_surcharge, PayPeriod::Month),
            tax.annual.solidarity_surcharge,
        );
        let church = monthly_church_tax(&tax, church_tax_rate);

        let employee_insurance_total = insurance.employee_total();
        let employer_insurance_total = insurance.employer_total();
        let taxes = wage_tax + solidarity_surcharge + church;
        let net_wage = PeriodAmount::new(
            gross.monthly - taxes.monthly - employee_insurance_total.monthly,
            gross.yearly - taxes.yearly - employee_insurance_total.yearly,
        );

        let levies = input
            .levies
            .map(|levies| levy_amounts(rules, &levies, gross.monthly))
            .unwrap_or_default();
        let employer_total_cost = gross + employer_insurance_total + levies.total();

        info!(
            correlation_id = %correlation_id,
            net_monthly = %net_wage.monthly,
            employer_cost_monthly = %employer_total_cost.monthly,
            "Gross-to-net calculation completed"
        );

        Ok(NetWageReport {
            year: input.year,
            gross,
            wage_tax,
            solidarity_surcharge,
            church_tax: church,
            church_tax_rate,
            insurance,
            employee_insurance_total,
            net_wage,
            employer_insurance_total,
            levies,
            employer_total_cost,
            tax_details: tax,
        })
    }

    /// Annual wage tax plus solidarity surcharge plus church tax.
    ///
    /// Skips the insurance calculation and the report. Years outside the
    /// rule book fall back to the latest year it holds, so long-running
    /// simulations keep working past the last published year.
    pub fn annual_tax_total(
        &self,
        year: u16,
        profile: &TaxpayerProfile,
        wage: &GrossWage,
    ) -> EngineResult<Decimal> {
        let rules = self.rule_book.get_or_latest(year)?;
        let tax = WageTaxEngine::new(rules).compute(profile, wage)?;
        let total = tax.annual.total();
        info!(year = year, rules_year = rules.year, total = %total, "Computed annual tax total");
        Ok(total)
    }
}

/// Church tax per month is assessed on the monthly share of its base.
fn monthly_church_tax(tax: &WageTaxResult, rate: Decimal) -> PeriodAmount {
    let monthly_base = apportion(tax.annual.church_tax_base, PayPeriod::Month);
    PeriodAmount::new(church_tax(monthly_base, rate), tax.annual.church_tax)
}

fn levy_amounts(rules: &YearRuleSet, levies: &EmployerLevies, monthly_gross: Decimal) -> LevyAmounts {
    let levy = |rate: Decimal| {
        let monthly = percent_of(monthly_gross, rate);
        PeriodAmount::new(monthly, monthly * Decimal::from(12))
    };
    LevyAmounts {
        illness: levy(levies.u1_rate),
        maternity: levy(levies.u2_rate),
        insolvency: levy(rules.social_insurance.insolvency_levy_rate),
    }
}
