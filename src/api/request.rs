//! Request types for the gross-to-net calculator.
//!
//! [`CalculationRequest`] mirrors the calculator's input form. It is
//! converted into a [`GrossToNetInput`] with [`TryFrom`], which rejects
//! values the engine cannot work with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    AccountingYear, EmployerLevies, FederalState, GrossToNetInput, GrossWage, HealthInsurance,
    PayPeriod, PensionIncome, PensionInsurance, TaxClass, TaxpayerProfile,
};

/// Largest gross wage accepted for one pay period.
pub const MAX_GROSS_WAGE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Largest add-on contribution rate accepted, in percent.
const MAX_ADD_ON_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Input of one gross-to-net calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Accounting year, 2019 to 2025.
    pub year: u16,
    /// Tax class, 1 to 6.
    pub tax_class: u8,
    /// Factor of the factor procedure (tax class IV only).
    #[serde(default)]
    pub factor: Option<Decimal>,
    /// Tax allowance per pay period.
    #[serde(default)]
    pub tax_allowance: Decimal,
    /// Amount added to the wage per pay period.
    #[serde(default)]
    pub addback: Decimal,
    /// Whether church tax is levied.
    #[serde(default)]
    pub church_tax: bool,
    /// German name of the federal state, e.g. "Nordrhein-Westfalen".
    pub state: String,
    /// Year of birth.
    pub birth_year: u16,
    /// Number of children.
    #[serde(default)]
    pub children: u32,
    /// Child allowance units (steps of 0.5).
    #[serde(default)]
    pub child_allowances: Decimal,
    /// Health insurance mode.
    pub health_insurance: HealthInsurance,
    /// Add-on contribution rate of the health fund in percent.
    #[serde(default)]
    pub add_on_rate: Decimal,
    /// Monthly private health and care premium.
    #[serde(default)]
    pub private_contribution: Decimal,
    /// Whether the employer subsidizes the private premium.
    #[serde(default)]
    pub employer_subsidy: bool,
    /// Whether the employee pays statutory pension insurance.
    #[serde(default = "default_true")]
    pub pension_insured: bool,
    /// Whether employer levies are computed.
    #[serde(default)]
    pub levies_enabled: bool,
    /// Illness levy rate (U1) in percent.
    #[serde(default)]
    pub u1_rate: Decimal,
    /// Maternity levy rate (U2) in percent.
    #[serde(default)]
    pub u2_rate: Decimal,
    /// Pension income contained in the wage.
    #[serde(default)]
    pub pension_income: Option<PensionIncome>,
    /// Gross wage for the pay period.
    pub gross_wage: Decimal,
    /// Pay period code: 1 year, 2 month, 3 week, 4 day.
    pub pay_period: u8,
}

fn default_true() -> bool {
    true
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}

fn non_negative(field: &str, value: Decimal) -> Result<Decimal, EngineError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(invalid(field, format!("must not be negative, got {}", value)))
    } else {
        Ok(value)
    }
}

impl TryFrom<CalculationRequest> for GrossToNetInput {
    type Error = EngineError;

    fn try_from(req: CalculationRequest) -> Result<Self, Self::Error> {
        let year = AccountingYear::try_from(req.year)?;
        let tax_class = TaxClass::try_from(req.tax_class)?;
        let state: FederalState = req.state.parse()?;
        let period = PayPeriod::from_code(req.pay_period)?;

        let gross_wage = non_negative("gross_wage", req.gross_wage)?;
        if gross_wage > MAX_GROSS_WAGE {
            return Err(invalid(
                "gross_wage",
                format!("must not exceed {}", MAX_GROSS_WAGE),
            ));
        }

        if req.birth_year < 1900 || req.birth_year > req.year {
            return Err(invalid(
                "birth_year",
                format!("{} is not between 1900 and {}", req.birth_year, req.year),
            ));
        }

        let child_allowances = non_negative("child_allowances", req.child_allowances)?;
        if !(child_allowances * Decimal::TWO).fract().is_zero() {
            return Err(invalid("child_allowances", "must be a multiple of 0.5"));
        }

        let add_on_rate = non_negative("add_on_rate", req.add_on_rate)?;
        if add_on_rate > MAX_ADD_ON_RATE {
            return Err(invalid(
                "add_on_rate",
                format!("must not exceed {}%", MAX_ADD_ON_RATE),
            ));
        }

        if let Some(factor) = req.factor {
            if factor <= Decimal::ZERO || factor >= Decimal::ONE || factor.normalize().scale() > 3 {
                return Err(invalid(
                    "factor",
                    "must be between 0 and 1 with at most three decimals",
                ));
            }
        }

        if let Some(pension) = &req.pension_income {
            non_negative("pension_income.period_amount", pension.period_amount)?;
            non_negative("pension_income.monthly_amount", pension.monthly_amount)?;
            non_negative("pension_income.special_payments", pension.special_payments)?;
            if pension.months_paid == 0 || pension.months_paid > 12 {
                return Err(invalid(
                    "pension_income.months_paid",
                    "must be between 1 and 12",
                ));
            }
            if pension.period_amount > gross_wage {
                return Err(invalid(
                    "pension_income.period_amount",
                    "must not exceed the gross wage",
                ));
            }
        }

        let levies = if req.levies_enabled {
            Some(EmployerLevies {
                u1_rate: non_negative("u1_rate", req.u1_rate)?,
                u2_rate: non_negative("u2_rate", req.u2_rate)?,
            })
        } else {
            None
        };

        let profile = TaxpayerProfile {
            tax_class,
            factor: req.factor,
            church_member: req.church_tax,
            state,
            birth_year: req.birth_year,
            children: req.children,
            child_allowances,
            health_insurance: req.health_insurance,
            add_on_rate,
            private_contribution: non_negative("private_contribution", req.private_contribution)?,
            employer_subsidy: req.employer_subsidy,
            pension_insurance: if req.pension_insured {
                PensionInsurance::Statutory
            } else {
                PensionInsurance::Exempt
            },
            allowance: non_negative("tax_allowance", req.tax_allowance)?,
            addback: non_negative("addback", req.addback)?,
            pension_income: req.pension_income,
            other_payments: Decimal::ZERO,
        };

        Ok(GrossToNetInput {
            year,
            profile,
            wage: GrossWage::new(gross_wage, period),
            levies,
        })
    }
}
