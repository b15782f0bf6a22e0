//! Taxpayer profile and related types.
//!
//! This module defines the [`TaxpayerProfile`] together with the tax class,
//! federal state and insurance regime enums it is built from.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The wage tax class (Steuerklasse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaxClass {
    /// Single taxpayers.
    I,
    /// Single parents.
    II,
    /// Married, the spouse in class V or without wages.
    III,
    /// Married, both spouses earning.
    IV,
    /// Married, the spouse in class III.
    V,
    /// Second and further employments.
    VI,
}

impl TaxClass {
    /// Returns the class number 1 to 6.
    pub fn number(self) -> u8 {
        match self {
            TaxClass::I => 1,
            TaxClass::II => 2,
            TaxClass::III => 3,
            TaxClass::IV => 4,
            TaxClass::V => 5,
            TaxClass::VI => 6,
        }
    }

    /// Returns the splitting factor of the tariff (2 for class III, else 1).
    pub fn splitting_factor(self) -> Decimal {
        if self == TaxClass::III {
            Decimal::TWO
        } else {
            Decimal::ONE
        }
    }

    /// Classes V and VI are taxed with the reference-income procedure.
    pub fn uses_class_five_six_procedure(self) -> bool {
        matches!(self, TaxClass::V | TaxClass::VI)
    }
}

impl TryFrom<u8> for TaxClass {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaxClass::I),
            2 => Ok(TaxClass::II),
            3 => Ok(TaxClass::III),
            4 => Ok(TaxClass::IV),
            5 => Ok(TaxClass::V),
            6 => Ok(TaxClass::VI),
            _ => Err(EngineError::InvalidInput {
                field: "tax_class".to_string(),
                message: format!("{} is not between 1 and 6", value),
            }),
        }
    }
}

impl From<TaxClass> for u8 {
    fn from(class: TaxClass) -> Self {
        class.number()
    }
}

/// The federal state of employment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederalState {
    /// Baden-Württemberg.
    BadenWuerttemberg,
    /// Bayern.
    Bavaria,
    /// Berlin.
    Berlin,
    /// Brandenburg.
    Brandenburg,
    /// Bremen.
    Bremen,
    /// Hamburg.
    Hamburg,
    /// Hessen.
    Hesse,
    /// Niedersachsen.
    LowerSaxony,
    /// Mecklenburg-Vorpommern.
    MecklenburgWesternPomerania,
    /// Nordrhein-Westfalen.
    NorthRhineWestphalia,
    /// Rheinland-Pfalz.
    RhinelandPalatinate,
    /// Saarland.
    Saarland,
    /// Sachsen.
    Saxony,
    /// Sachsen-Anhalt.
    SaxonyAnhalt,
    /// Schleswig-Holstein.
    SchleswigHolstein,
    /// Thüringen.
    Thuringia,
}

impl FederalState {
    const NAMES: [(&'static str, FederalState); 16] = [
        ("Baden-Württemberg", FederalState::BadenWuerttemberg),
        ("Bayern", FederalState::Bavaria),
        ("Berlin", FederalState::Berlin),
        ("Brandenburg", FederalState::Brandenburg),
        ("Bremen", FederalState::Bremen),
        ("Hamburg", FederalState::Hamburg),
        ("Hessen", FederalState::Hesse),
        ("Niedersachsen", FederalState::LowerSaxony),
        ("Mecklenburg-Vorpommern", FederalState::MecklenburgWesternPomerania),
        ("Nordrhein-Westfalen", FederalState::NorthRhineWestphalia),
        ("Rheinland-Pfalz", FederalState::RhinelandPalatinate),
        ("Saarland", FederalState::Saarland),
        ("Sachsen", FederalState::Saxony),
        ("Sachsen-Anhalt", FederalState::SaxonyAnhalt),
        ("Schleswig-Holstein", FederalState::SchleswigHolstein),
        ("Thüringen", FederalState::Thuringia),
    ];

    /// Returns the German name of the state.
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, state)| *state == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }

    /// States using the eastern pension contribution ceiling.
    pub fn is_east(self) -> bool {
        matches!(
            self,
            FederalState::Brandenburg
                | FederalState::MecklenburgWesternPomerania
                | FederalState::Saxony
                | FederalState::SaxonyAnhalt
                | FederalState::Thuringia
        )
    }

    /// Saxony splits care insurance differently between employee and employer.
    pub fn is_saxony(self) -> bool {
        self == FederalState::Saxony
    }

    /// Church tax rate in percent of the income tax.
    pub fn church_tax_rate(self) -> Decimal {
        match self {
            FederalState::BadenWuerttemberg | FederalState::Bavaria => Decimal::from(8),
            _ => Decimal::from(9),
        }
    }
}

impl FromStr for FederalState {
    type Err = EngineError;

    /// Parses the German state name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::NAMES
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, state)| *state)
            .ok_or_else(|| EngineError::InvalidInput {
                field: "state".to_string(),
                message: format!("unknown federal state '{}'", s),
            })
    }
}

/// How the employee is health insured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthInsurance {
    /// Statutory insurance at the general rate.
    StatutoryGeneral,
    /// Statutory insurance at the reduced rate (no sick pay entitlement).
    StatutoryReduced,
    /// Private insurance.
    Private,
}

/// Whether the employee pays statutory pension insurance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionInsurance {
    /// Statutory pension insurance.
    Statutory,
    /// Not insured in the statutory scheme.
    Exempt,
}

/// Occupational pension income (Versorgungsbezüge) paid with the wage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionIncome {
    /// Pension income contained in the wage of the pay period.
    pub period_amount: Decimal,
    /// The regular monthly pension.
    pub monthly_amount: Decimal,
    /// Expected special pension payments in the year.
    #[serde(default)]
    pub special_payments: Decimal,
    /// The year the pension started.
    pub start_year: u16,
    /// Months the pension is paid in the year, for yearly pay periods.
    #[serde(default = "twelve_months")]
    pub months_paid: u8,
}

fn twelve_months() -> u8 {
    12
}

/// Everything about the taxpayer the engine needs besides the wage.
///
/// # Example
///
/// ```
/// use wage_tax_engine::models::{FederalState, TaxClass, TaxpayerProfile};
///
/// let profile = TaxpayerProfile {
///     church_member: true,
///     ..TaxpayerProfile::new(TaxClass::I, FederalState::Hesse, 1990)
/// };
/// assert_eq!(profile.age_in(2024), 34);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    /// The wage tax class.
    pub tax_class: TaxClass,
    /// Factor of the factor procedure, tax class IV only.
    #[serde(default)]
    pub factor: Option<Decimal>,
    /// Whether church tax is levied.
    #[serde(default)]
    pub church_member: bool,
    /// The federal state of employment.
    pub state: FederalState,
    /// The year of birth.
    pub birth_year: u16,
    /// Number of children relevant for care insurance.
    #[serde(default)]
    pub children: u32,
    /// Child allowance units on the tax card (0.5 steps).
    #[serde(default)]
    pub child_allowances: Decimal,
    /// Health insurance regime.
    pub health_insurance: HealthInsurance,
    /// Add-on contribution rate of the health fund in percent.
    #[serde(default)]
    pub add_on_rate: Decimal,
    /// Monthly private health and care insurance premium.
    #[serde(default)]
    pub private_contribution: Decimal,
    /// Whether the employer subsidizes the private premium.
    #[serde(default)]
    pub employer_subsidy: bool,
    /// Pension insurance regime.
    pub pension_insurance: PensionInsurance,
    /// Tax allowance per pay period (Freibetrag).
    #[serde(default)]
    pub allowance: Decimal,
    /// Amount added to the wage per pay period (Hinzurechnungsbetrag).
    #[serde(default)]
    pub addback: Decimal,
    /// Occupational pension income contained in the wage.
    #[serde(default)]
    pub pension_income: Option<PensionIncome>,
    /// Other payments (bonuses) in the pay period.
    #[serde(default)]
    pub other_payments: Decimal,
}

impl TaxpayerProfile {
    /// Creates a statutorily insured profile without children or allowances.
    pub fn new(tax_class: TaxClass, state: FederalState, birth_year: u16) -> Self {
        Self {
            tax_class,
            factor: None,
            church_member: false,
            state,
            birth_year,
            children: 0,
            child_allowances: Decimal::ZERO,
            health_insurance: HealthInsurance::StatutoryGeneral,
            add_on_rate: Decimal::ZERO,
            private_contribution: Decimal::ZERO,
            employer_subsidy: false,
            pension_insurance: PensionInsurance::Statutory,
            allowance: Decimal::ZERO,
            addback: Decimal::ZERO,
            pension_income: None,
            other_payments: Decimal::ZERO,
        }
    }

    /// Age reached in the given calendar year.
    pub fn age_in(&self, year: u16) -> i32 {
        i32::from(year) - i32::from(self.birth_year)
    }

    /// Whether the 64th birthday was completed before the year started.
    pub fn has_age_relief(&self, year: u16) -> bool {
        i32::from(self.birth_year) + 64 < i32::from(year)
    }

    /// The first year after the 64th birthday.
    pub fn age_relief_start_year(&self) -> u16 {
        self.birth_year.saturating_add(65)
    }

    /// Whether the childless surcharge on care insurance is due.
    pub fn owes_childless_surcharge(&self, year: u16, age_threshold: u16) -> bool {
        self.children == 0 && self.age_in(year) > i32::from(age_threshold)
    }

    /// Whether the employee is privately health insured.
    pub fn is_privately_insured(&self) -> bool {
        self.health_insurance == HealthInsurance::Private
    }

    /// The factor applied to the annual tax (1 outside the factor procedure).
    pub fn tax_factor(&self) -> Decimal {
        match (self.tax_class, self.factor) {
            (TaxClass::IV, Some(factor)) => factor,
            _ => Decimal::ONE,
        }
    }
}
