//! Wage-tax result models.
//!
//! This module contains the [`WageTaxResult`] produced by the wage-tax engine
//! and the audit trail types that record how each figure was reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountingYear, PayPeriod};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The statutory provision behind the rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs that were accepted but ignored or adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace of one computation.
///
/// # Example
///
/// ```
/// use wage_tax_engine::models::AuditTrace;
///
/// let mut trace = AuditTrace::default();
/// trace.record(
///     "annualization",
///     "Annualization",
///     "§ 39b Abs. 2 Satz 2 EStG",
///     serde_json::json!({ "wage": "3000" }),
///     serde_json::json!({ "annual_wage": "36000" }),
///     "3000 x 12 = 36000".to_string(),
/// );
/// assert_eq!(trace.steps[0].step_number, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step numbered after the last recorded one.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        clause_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            clause_ref: clause_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message: message.into(),
        });
    }
}

/// Tax, surcharge and church tax for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFigures {
    /// Wage withholding tax.
    pub wage_tax: Decimal,
    /// Solidarity surcharge.
    pub solidarity_surcharge: Decimal,
    /// The tax church tax is assessed on (after child allowances).
    pub church_tax_base: Decimal,
    /// Church tax, zero for non-members.
    pub church_tax: Decimal,
}

impl TaxFigures {
    /// Sum of wage tax, solidarity surcharge and church tax.
    pub fn total(&self) -> Decimal {
        self.wage_tax + self.solidarity_surcharge + self.church_tax
    }
}

/// The outcome of one wage-tax computation.
///
/// All amounts are in euros. `annual` holds the year figures the period
/// figures were apportioned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageTaxResult {
    /// The accounting year of the rules applied.
    pub year: AccountingYear,
    /// The pay period of `period`.
    pub pay_period: PayPeriod,
    /// The wage annualized for the computation.
    pub annual_wage: Decimal,
    /// Figures for the whole year.
    pub annual: TaxFigures,
    /// Figures for the pay period.
    pub period: TaxFigures,
    /// Tax on other payments; zero when none were made.
    pub other_payments: TaxFigures,
    /// Annual taxable income before child allowances.
    pub taxable_income: Decimal,
    /// The precaution-expense allowance deducted.
    pub precaution_allowance: Decimal,
    /// Private insurance premiums deductible in the pay period.
    pub deductible_private_insurance: Decimal,
    /// Allowances consumed by the computation (lump sums and pension relief).
    pub consumed_allowances: Decimal,
    /// Part of the taxable income above the basic allowance, floored at zero.
    pub income_above_basic_allowance: Decimal,
    /// How the figures were reached.
    pub audit_trace: AuditTrace,
}
