//! Pension relief and age relief.
//!
//! Both reliefs are looked up in the year's relief tables. The table entry is
//! selected by the year the relief started, capped at the last entry, so a
//! pension that began in 2010 keeps the 2010 percentage for life.

use rust_decimal::Decimal;

use super::rounding::{floor_at_zero, round_down, round_up};
use crate::config::ReliefTables;
use crate::models::{AuditStep, PayPeriod, PensionIncome};

/// Pension relief (Versorgungsfreibetrag) and its supplement.
#[derive(Debug, Clone)]
pub struct PensionRelief {
    /// Annual pension income contained in the wage (ZVBEZJ).
    pub annual_pension: Decimal,
    /// The relief allowance (FVB).
    pub allowance: Decimal,
    /// The supplement to the relief allowance (FVBZ).
    pub supplement: Decimal,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
}

/// Computes the pension relief for the pension income contained in the wage.
///
/// `annual_pension` is the pension part of the annualized wage. With a
/// yearly pay period the caps are prorated to the months the pension was
/// paid; otherwise the regular monthly pension is annualized.
pub fn pension_relief(
    tables: &ReliefTables,
    pension: Option<&PensionIncome>,
    annual_pension: Decimal,
    period: PayPeriod,
    step_number: u32,
) -> PensionRelief {
    let pension = match pension {
        Some(pension) if annual_pension > Decimal::ZERO => pension,
        _ => {
            return PensionRelief {
                annual_pension,
                allowance: Decimal::ZERO,
                supplement: Decimal::ZERO,
                audit_step: AuditStep {
                    step_number,
                    rule_id: "pension_relief".to_string(),
                    rule_name: "Pension Relief".to_string(),
                    clause_ref: "§ 19 Abs. 2 EStG".to_string(),
                    input: serde_json::json!({ "annual_pension": annual_pension.to_string() }),
                    output: serde_json::json!({ "allowance": "0", "supplement": "0" }),
                    reasoning: "No pension income - no pension relief".to_string(),
                },
            };
        }
    };

    let index = tables.index_for(pension.start_year);
    let rate = tables.pension_relief_rate[index];
    let max = tables.pension_relief_max[index];
    let max_supplement = tables.pension_relief_supplement[index];
    let twelve = Decimal::from(12);

    let (base, cap, mut supplement) = if period == PayPeriod::Year {
        let months = Decimal::from(pension.months_paid);
        (
            pension.monthly_amount * months + pension.special_payments,
            max / twelve * months,
            round_up(max_supplement / twelve * months, 0),
        )
    } else {
        (
            round_down(pension.monthly_amount * twelve + pension.special_payments, 2),
            max,
            max_supplement,
        )
    };

    let allowance = round_up(base * rate, 2).min(cap).min(annual_pension);
    let remaining = round_down(base - allowance, 2);
    if supplement > remaining {
        supplement = round_up(remaining, 0);
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "pension_relief".to_string(),
        rule_name: "Pension Relief".to_string(),
        clause_ref: "§ 19 Abs. 2 EStG".to_string(),
        input: serde_json::json!({
            "annual_pension": annual_pension.to_string(),
            "assessment_base": base.to_string(),
            "start_year": pension.start_year,
        }),
        output: serde_json::json!({
            "allowance": allowance.to_string(),
            "supplement": supplement.to_string(),
        }),
        reasoning: format!(
            "{} x {} capped at {} = {}; supplement {}",
            base,
            rate.normalize(),
            cap.normalize(),
            allowance,
            supplement
        ),
    };

    PensionRelief {
        annual_pension,
        allowance,
        supplement,
        audit_step,
    }
}

/// The age relief (Altersentlastungsbetrag).
#[derive(Debug, Clone)]
pub struct AgeRelief {
    /// The relief amount.
    pub amount: Decimal,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
}

/// Computes the age relief on the wage that is not pension income.
///
/// `start_year` is `None` when the taxpayer has not completed the 64th year
/// of life before the accounting year.
pub fn age_relief(
    tables: &ReliefTables,
    start_year: Option<u16>,
    annual_wage: Decimal,
    annual_pension: Decimal,
    step_number: u32,
) -> AgeRelief {
    let Some(start_year) = start_year else {
        return AgeRelief {
            amount: Decimal::ZERO,
            audit_step: AuditStep {
                step_number,
                rule_id: "age_relief".to_string(),
                rule_name: "Age Relief".to_string(),
                clause_ref: "§ 24a EStG".to_string(),
                input: serde_json::json!({ "annual_wage": annual_wage.to_string() }),
                output: serde_json::json!({ "amount": "0" }),
                reasoning: "64th year of life not completed - no age relief".to_string(),
            },
        };
    };

    let index = tables.index_for(start_year);
    let rate = tables.age_relief_rate[index];
    let max = tables.age_relief_max[index];
    let base = floor_at_zero(annual_wage - annual_pension);
    let amount = round_up(base * rate, 0).min(max);

    AgeRelief {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "age_relief".to_string(),
            rule_name: "Age Relief".to_string(),
            clause_ref: "§ 24a EStG".to_string(),
            input: serde_json::json!({
                "annual_wage": annual_wage.to_string(),
                "annual_pension": annual_pension.to_string(),
                "start_year": start_year,
            }),
            output: serde_json::json!({ "amount": amount.to_string() }),
            reasoning: format!(
                "{} x {} capped at {} = {}",
                base,
                rate.normalize(),
                max.normalize(),
                amount
            ),
        },
    }
}
