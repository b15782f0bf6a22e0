//! Year rule-set types.
//!
//! This module contains the strongly-typed parameter structures that are
//! deserialized from the per-year YAML files. A [`YearRuleSet`] is immutable
//! once validated and is shared by reference across computations.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Coefficients of the four-zone income tax tariff (§ 32a EStG).
///
/// Zone boundaries are inclusive upper limits of taxable income in whole
/// euros. The first zone starts above the basic allowance.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffCoefficients {
    /// Upper limit of the first progressive zone.
    pub first_zone_end: Decimal,
    /// Upper limit of the second progressive zone.
    pub second_zone_end: Decimal,
    /// Upper limit of the 42% zone.
    pub third_zone_end: Decimal,
    /// Quadratic coefficient of the first progressive zone.
    pub first_zone_quadratic: Decimal,
    /// Linear coefficient of the first progressive zone.
    pub first_zone_linear: Decimal,
    /// Quadratic coefficient of the second progressive zone.
    pub second_zone_quadratic: Decimal,
    /// Linear coefficient of the second progressive zone.
    pub second_zone_linear: Decimal,
    /// Tax at the start of the second progressive zone.
    pub second_zone_base: Decimal,
    /// Amount subtracted in the 42% zone.
    pub third_zone_offset: Decimal,
    /// Amount subtracted in the 45% zone.
    pub fourth_zone_offset: Decimal,
}

/// Income tax parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxRules {
    /// Basic allowance (Grundfreibetrag).
    pub basic_allowance: Decimal,
    /// Tariff coefficients.
    pub tariff: TariffCoefficients,
    /// The three taxable-income boundaries of the class V/VI procedure.
    pub class_five_six_limits: [Decimal; 3],
    /// Employee lump sum for income-related expenses.
    pub employee_lump_sum: Decimal,
    /// Lump sum for income-related expenses on pension income.
    pub pension_lump_sum: Decimal,
    /// Special-expense lump sum (Sonderausgaben-Pauschbetrag).
    pub special_expense_lump_sum: Decimal,
    /// Relief for single parents, tax class II only.
    pub single_parent_relief: Decimal,
    /// Annual child allowance for one full allowance unit in classes I to III.
    pub child_allowance: Decimal,
}

/// Solidarity surcharge parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SolidarityRules {
    /// Annual tax up to which no surcharge is levied (per splitting unit).
    pub exemption: Decimal,
    /// Marginal rate in percent applied to tax above the exemption.
    pub marginal_rate: Decimal,
}

/// Parameters of the precaution-expense allowance (Vorsorgepauschale).
#[derive(Debug, Clone, Deserialize)]
pub struct PrecautionRules {
    /// Deductible share of pension contributions.
    pub pension_deductible_share: Decimal,
    /// Rate of the minimum allowance on wages.
    pub lump_sum_rate: Decimal,
    /// Cap of the minimum allowance.
    pub lump_sum_cap: Decimal,
    /// Cap of the minimum allowance for tax class III.
    pub lump_sum_cap_joint: Decimal,
}

/// The five relief lookup tables, indexed by the year the relief started.
///
/// Entry `n` belongs to the year `first_year + n`. Years before the first
/// entry use the first entry; years after the last use the last.
#[derive(Debug, Clone, Deserialize)]
pub struct ReliefTables {
    /// The year of the first table entry.
    pub first_year: u16,
    /// Pension-relief percentage (Versorgungsfreibetrag), as a fraction.
    pub pension_relief_rate: Vec<Decimal>,
    /// Pension-relief maximum amount.
    pub pension_relief_max: Vec<Decimal>,
    /// Pension-relief supplement (Zuschlag zum Versorgungsfreibetrag).
    pub pension_relief_supplement: Vec<Decimal>,
    /// Age-relief percentage (Altersentlastungsbetrag), as a fraction.
    pub age_relief_rate: Vec<Decimal>,
    /// Age-relief maximum amount.
    pub age_relief_max: Vec<Decimal>,
}

impl ReliefTables {
    /// Returns the capped table index for the year a relief started.
    pub fn index_for(&self, start_year: u16) -> usize {
        let last = self.pension_relief_rate.len().saturating_sub(1);
        (start_year.saturating_sub(self.first_year) as usize).min(last)
    }

    fn validate(&self, year: u16) -> EngineResult<()> {
        let len = self.pension_relief_rate.len();
        let lengths = [
            self.pension_relief_max.len(),
            self.pension_relief_supplement.len(),
            self.age_relief_rate.len(),
            self.age_relief_max.len(),
        ];
        if len == 0 || lengths.iter().any(|l| *l != len) {
            return Err(EngineError::InvalidRuleSet {
                year,
                message: "relief tables must be non-empty and of equal length".to_string(),
            });
        }
        Ok(())
    }
}

/// Care insurance rates in percent.
#[derive(Debug, Clone, Deserialize)]
pub struct CareRates {
    /// Employee share outside Saxony.
    pub employee_rate: Decimal,
    /// Employer share outside Saxony.
    pub employer_rate: Decimal,
    /// Employee share in Saxony.
    pub saxony_employee_rate: Decimal,
    /// Employer share in Saxony.
    pub saxony_employer_rate: Decimal,
    /// Surcharge on the employee share for childless insured persons.
    pub childless_surcharge: Decimal,
    /// The surcharge applies above this age.
    pub childless_age_threshold: u16,
    /// Reduction of the employee share per child from the second child on.
    #[serde(default)]
    pub child_discount_step: Decimal,
    /// Number of children beyond the first that earn a reduction.
    #[serde(default)]
    pub max_discounted_children: u32,
}

/// Annual contribution ceilings (Beitragsbemessungsgrenzen).
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionCeilings {
    /// Pension and unemployment insurance, western states.
    pub pension_west: Decimal,
    /// Pension and unemployment insurance, eastern states.
    pub pension_east: Decimal,
    /// Health and care insurance.
    pub health: Decimal,
}

/// Social insurance parameters. Rates are total rates in percent.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialInsuranceRules {
    /// Pension insurance rate.
    pub pension_rate: Decimal,
    /// Unemployment insurance rate.
    pub unemployment_rate: Decimal,
    /// General health insurance rate.
    pub health_general_rate: Decimal,
    /// Reduced health insurance rate (no sick pay entitlement).
    pub health_reduced_rate: Decimal,
    /// Average add-on contribution rate announced for the year.
    pub average_add_on_rate: Decimal,
    /// Care insurance rates.
    pub care: CareRates,
    /// Contribution ceilings.
    pub ceilings: ContributionCeilings,
    /// Monthly earnings limit of a mini-job.
    pub mini_job_monthly_limit: Decimal,
    /// Maximum monthly employer subsidy for private health insurance.
    pub private_health_subsidy_cap_monthly: Decimal,
    /// Insolvency benefit levy rate, paid by the employer.
    pub insolvency_levy_rate: Decimal,
}

impl SocialInsuranceRules {
    /// Annual wage below which no health, care or unemployment contributions are due.
    pub fn mini_job_annual_limit(&self) -> Decimal {
        self.mini_job_monthly_limit * Decimal::from(12)
    }

    /// Maximum annual employer subsidy for private health insurance.
    pub fn private_health_subsidy_cap(&self) -> Decimal {
        self.private_health_subsidy_cap_monthly * Decimal::from(12)
    }
}

/// All parameters of one accounting year.
#[derive(Debug, Clone, Deserialize)]
pub struct YearRuleSet {
    /// The accounting year.
    pub year: u16,
    /// Whether the care insurance employee rate is reduced per child.
    #[serde(default)]
    pub supports_child_discount_tiers: bool,
    /// Income tax parameters.
    pub income_tax: IncomeTaxRules,
    /// Solidarity surcharge parameters.
    pub solidarity: SolidarityRules,
    /// Precaution-expense allowance parameters.
    pub precaution: PrecautionRules,
    /// Pension and age relief tables.
    pub relief_tables: ReliefTables,
    /// Social insurance parameters.
    pub social_insurance: SocialInsuranceRules,
}

impl YearRuleSet {
    /// Checks the structural invariants the engine relies on.
    pub fn validate(&self) -> EngineResult<()> {
        self.relief_tables.validate(self.year)?;

        let tariff = &self.income_tax.tariff;
        let ordered = self.income_tax.basic_allowance < tariff.first_zone_end
            && tariff.first_zone_end < tariff.second_zone_end
            && tariff.second_zone_end < tariff.third_zone_end;
        if !ordered {
            return Err(EngineError::InvalidRuleSet {
                year: self.year,
                message: "tariff zone boundaries are not ascending".to_string(),
            });
        }

        let [w1, w2, w3] = self.income_tax.class_five_six_limits;
        if !(w1 < w2 && w2 < w3) {
            return Err(EngineError::InvalidRuleSet {
                year: self.year,
                message: "class V/VI limits are not ascending".to_string(),
            });
        }

        let care = &self.social_insurance.care;
        if self.supports_child_discount_tiers
            && (care.child_discount_step <= Decimal::ZERO || care.max_discounted_children == 0)
        {
            return Err(EngineError::InvalidRuleSet {
                year: self.year,
                message: "child discount tiers need a step and a child count".to_string(),
            });
        }

        Ok(())
    }

    /// Pension insurance ceiling for the region.
    pub fn pension_ceiling(&self, east: bool) -> Decimal {
        let ceilings = &self.social_insurance.ceilings;
        if east {
            ceilings.pension_east
        } else {
            ceilings.pension_west
        }
    }
}
