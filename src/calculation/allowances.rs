//! Net annual wage and the fixed deductions of the tax table.
//!
//! The net annual wage is the annualized wage after reliefs and the
//! taxpayer's own allowance. The fixed deductions are the lump sums built
//! into the wage-tax tables for each tax class.

use rust_decimal::Decimal;

use super::rounding::{floor_at_zero, round_down, round_up};
use crate::config::IncomeTaxRules;
use crate::models::{AuditStep, TaxClass};

/// The annual wage figures after reliefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetAnnualWage {
    /// Wage after reliefs, allowance and addback, floored at zero (ZRE4).
    pub taxable_wage: Decimal,
    /// The annual wage the precaution allowance is based on (ZRE4VP).
    pub precaution_base: Decimal,
    /// Pension income after pension relief, floored at zero (ZVBEZ).
    pub net_pension: Decimal,
}

/// Deducts reliefs and the taxpayer's allowance from the annual wage.
///
/// The precaution base stays at the full annual wage; reliefs never lower
/// the insurance contributions the allowance approximates.
pub fn net_annual_wage(
    annual_wage: Decimal,
    annual_pension: Decimal,
    pension_relief: Decimal,
    age_relief: Decimal,
    annual_allowance: Decimal,
    annual_addback: Decimal,
) -> NetAnnualWage {
    let taxable_wage = floor_at_zero(round_down(
        annual_wage - pension_relief - age_relief - annual_allowance + annual_addback,
        2,
    ));
    let net_pension = floor_at_zero(round_down(annual_pension - pension_relief, 2));

    NetAnnualWage {
        taxable_wage,
        precaution_base: floor_at_zero(annual_wage),
        net_pension,
    }
}

/// The lump sums and allowances built into the tax table.
#[derive(Debug, Clone)]
pub struct FixedDeductions {
    /// Employee lump sum for wages and pensions (ANP).
    pub employee_lump_sum: Decimal,
    /// Special-expense lump sum (SAP).
    pub special_expense_lump_sum: Decimal,
    /// Relief for single parents (EFA).
    pub single_parent_relief: Decimal,
    /// Pension relief supplement after the net-pension cap (FVBZ).
    pub pension_supplement: Decimal,
    /// Child allowance, only deducted for the church tax and surcharge base (KFB).
    pub child_allowance: Decimal,
    /// Splitting factor of the tariff (KZTAB).
    pub splitting_factor: Decimal,
    /// Sum of the deductions applied to the wage-tax base (ZTABFB).
    pub total: Decimal,
    /// The audit step recording the deductions.
    pub audit_step: AuditStep,
}

/// Computes the fixed deductions for a tax class.
///
/// Tax class VI gets none of the lump sums. The employee lump sum is
/// limited to the wage it covers, and the pension lump sum to the pension
/// left after relief and supplement.
pub fn fixed_deductions(
    rules: &IncomeTaxRules,
    tax_class: TaxClass,
    child_allowances: Decimal,
    net: &NetAnnualWage,
    pension_supplement: Decimal,
    step_number: u32,
) -> FixedDeductions {
    let mut supplement = pension_supplement.min(net.net_pension);
    let mut employee_lump_sum = Decimal::ZERO;

    if tax_class == TaxClass::VI {
        supplement = Decimal::ZERO;
    } else {
        if net.net_pension > Decimal::ZERO {
            let uncovered = net.net_pension - supplement;
            employee_lump_sum = if uncovered < rules.pension_lump_sum {
                round_up(uncovered, 0)
            } else {
                rules.pension_lump_sum
            };
        }
        if net.taxable_wage > net.net_pension {
            let active_wage = net.taxable_wage - net.net_pension;
            employee_lump_sum = if active_wage < rules.employee_lump_sum {
                round_up(employee_lump_sum + active_wage, 0)
            } else {
                employee_lump_sum + rules.employee_lump_sum
            };
        }
    }

    let mut special_expense_lump_sum = rules.special_expense_lump_sum;
    let mut single_parent_relief = Decimal::ZERO;
    let mut splitting_factor = Decimal::ONE;
    let child_allowance = match tax_class {
        TaxClass::I => round_down(child_allowances * rules.child_allowance, 0),
        TaxClass::II => {
            single_parent_relief = rules.single_parent_relief;
            round_down(child_allowances * rules.child_allowance, 0)
        }
        TaxClass::III => {
            splitting_factor = Decimal::TWO;
            round_down(child_allowances * rules.child_allowance, 0)
        }
        TaxClass::IV => round_down(child_allowances * (rules.child_allowance / Decimal::TWO), 0),
        TaxClass::V => Decimal::ZERO,
        TaxClass::VI => {
            special_expense_lump_sum = Decimal::ZERO;
            Decimal::ZERO
        }
    };

    let total = round_down(
        single_parent_relief + employee_lump_sum + special_expense_lump_sum + supplement,
        2,
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "fixed_deductions".to_string(),
        rule_name: "Fixed Deductions".to_string(),
        clause_ref: "§ 39b Abs. 2 Satz 5 Nr. 1 EStG".to_string(),
        input: serde_json::json!({
            "tax_class": tax_class.number(),
            "taxable_wage": net.taxable_wage.to_string(),
            "net_pension": net.net_pension.to_string(),
            "child_allowances": child_allowances.to_string(),
        }),
        output: serde_json::json!({
            "employee_lump_sum": employee_lump_sum.to_string(),
            "special_expense_lump_sum": special_expense_lump_sum.to_string(),
            "single_parent_relief": single_parent_relief.to_string(),
            "pension_supplement": supplement.to_string(),
            "child_allowance": child_allowance.to_string(),
            "total": total.to_string(),
        }),
        reasoning: format!(
            "Tax class {}: {} + {} + {} + {} = {}",
            tax_class.number(),
            single_parent_relief,
            employee_lump_sum,
            special_expense_lump_sum,
            supplement,
            total
        ),
    };

    FixedDeductions {
        employee_lump_sum,
        special_expense_lump_sum,
        single_parent_relief,
        pension_supplement: supplement,
        child_allowance,
        splitting_factor,
        total,
        audit_step,
    }
}
