//! Solidarity surcharge and church tax.
//!
//! Both are assessed on the annual tax after child allowances, which can be
//! lower than the withheld wage tax.

use rust_decimal::Decimal;

use super::rounding::round_down;
use crate::config::SolidarityRules;
use crate::models::AuditStep;

/// Full surcharge rate in percent.
pub const SOLIDARITY_RATE: Decimal = Decimal::from_parts(55, 0, 0, false, 1);

/// The annual solidarity surcharge and its audit step.
#[derive(Debug, Clone)]
pub struct SolidaritySurcharge {
    /// The annual surcharge.
    pub annual: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the annual solidarity surcharge.
///
/// Nothing is due up to the exemption (doubled for splitting). Above it the
/// surcharge is the lower of 5.5% of the tax and the marginal rate on the
/// excess, so it phases in without a jump.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::solidarity_surcharge;
/// use wage_tax_engine::config::SolidarityRules;
///
/// let rules = SolidarityRules { exemption: dec!(972), marginal_rate: dec!(20) };
/// let surcharge = solidarity_surcharge(&rules, dec!(4999), dec!(1), 1);
/// assert_eq!(surcharge.annual, dec!(274.94));
/// ```
pub fn solidarity_surcharge(
    rules: &SolidarityRules,
    base_tax: Decimal,
    splitting_factor: Decimal,
    step_number: u32,
) -> SolidaritySurcharge {
    let exemption = rules.exemption * splitting_factor;
    let (annual, reasoning) = if base_tax > exemption {
        let full = round_down(base_tax * SOLIDARITY_RATE / Decimal::ONE_HUNDRED, 2);
        let marginal = round_down(
            (base_tax - exemption) * rules.marginal_rate / Decimal::ONE_HUNDRED,
            2,
        );
        if marginal < full {
            (
                marginal,
                format!(
                    "({} - {}) x {}% = {} (below full rate {})",
                    base_tax,
                    exemption,
                    rules.marginal_rate.normalize(),
                    marginal,
                    full
                ),
            )
        } else {
            (full, format!("{} x 5.5% = {}", base_tax, full))
        }
    } else {
        (
            Decimal::ZERO,
            format!("Tax {} does not exceed exemption {}", base_tax, exemption),
        )
    };

    SolidaritySurcharge {
        annual,
        audit_step: AuditStep {
            step_number,
            rule_id: "solidarity_surcharge".to_string(),
            rule_name: "Solidarity Surcharge".to_string(),
            clause_ref: "§ 3 und § 4 SolZG".to_string(),
            input: serde_json::json!({
                "base_tax": base_tax.to_string(),
                "exemption": exemption.to_string(),
            }),
            output: serde_json::json!({ "annual": annual.to_string() }),
            reasoning,
        },
    }
}

/// Church tax on a tax amount at a rate in percent, truncated to cents.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::church_tax;
///
/// assert_eq!(church_tax(dec!(341.00), dec!(9)), dec!(30.69));
/// assert_eq!(church_tax(dec!(317.08), dec!(8)), dec!(25.36));
/// ```
pub fn church_tax(base_tax: Decimal, rate: Decimal) -> Decimal {
    round_down(base_tax * rate / Decimal::ONE_HUNDRED, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rules_2021() -> SolidarityRules {
        SolidarityRules {
            exemption: dec!(16956),
            marginal_rate: dec!(11.9),
        }
    }

    #[test]
    fn test_solidarity_rate_constant() {
        assert_eq!(SOLIDARITY_RATE, dec!(5.5));
    }

    #[test]
    fn test_no_surcharge_up_to_exemption() {
        let surcharge = solidarity_surcharge(&rules_2021(), dec!(16956), dec!(1), 1);
        assert_eq!(surcharge.annual, Decimal::ZERO);
    }

    #[test]
    fn test_marginal_zone() {
        // (18000 - 16956) x 11.9% = 124.23 < 990
        let surcharge = solidarity_surcharge(&rules_2021(), dec!(18000), dec!(1), 1);
        assert_eq!(surcharge.annual, dec!(124.23));
    }

    #[test]
    fn test_full_rate_above_marginal_zone() {
        let surcharge = solidarity_surcharge(&rules_2021(), dec!(40000), dec!(1), 1);
        assert_eq!(surcharge.annual, dec!(2200.00));
    }

    #[test]
    fn test_splitting_doubles_exemption() {
        let surcharge = solidarity_surcharge(&rules_2021(), dec!(30000), dec!(2), 1);
        assert_eq!(surcharge.annual, Decimal::ZERO);
    }

    #[test]
    fn test_church_tax_truncates() {
        assert_eq!(church_tax(dec!(4092), dec!(9)), dec!(368.28));
        assert_eq!(church_tax(dec!(0.99), dec!(8)), dec!(0.07));
    }
}
