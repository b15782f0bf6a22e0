//! Gross-to-net input and report models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountingYear, GrossWage, InsuranceResult, PeriodAmount, TaxpayerProfile, WageTaxResult};

/// Employer levies on top of social insurance contributions.
///
/// Rates are in percent of gross wage. The insolvency levy rate is not part
/// of this record because it is fixed per accounting year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerLevies {
    /// Illness levy (U1).
    pub u1_rate: Decimal,
    /// Maternity levy (U2).
    pub u2_rate: Decimal,
}

/// Levy amounts paid by the employer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyAmounts {
    /// Illness levy (U1).
    pub illness: PeriodAmount,
    /// Maternity levy (U2).
    pub maternity: PeriodAmount,
    /// Insolvency benefit levy.
    pub insolvency: PeriodAmount,
}

impl LevyAmounts {
    /// Sum of all levies.
    pub fn total(&self) -> PeriodAmount {
        self.illness + self.maternity + self.insolvency
    }
}

/// Everything the gross-to-net computation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossToNetInput {
    /// The accounting year.
    pub year: AccountingYear,
    /// The taxpayer.
    pub profile: TaxpayerProfile,
    /// The gross wage and its pay period.
    pub wage: GrossWage,
    /// Employer levies, if the employer pays them.
    #[serde(default)]
    pub levies: Option<EmployerLevies>,
}

/// The gross-to-net report for one employee and year.
///
/// Every amount is stated per month and per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWageReport {
    /// The accounting year.
    pub year: AccountingYear,
    /// Gross wage.
    pub gross: PeriodAmount,
    /// Wage withholding tax.
    pub wage_tax: PeriodAmount,
    /// Solidarity surcharge.
    pub solidarity_surcharge: PeriodAmount,
    /// Church tax.
    pub church_tax: PeriodAmount,
    /// Church tax rate in percent, zero for non-members.
    pub church_tax_rate: Decimal,
    /// Contributions per insurance branch.
    pub insurance: InsuranceResult,
    /// Sum of the employee's insurance contributions.
    pub employee_insurance_total: PeriodAmount,
    /// Gross minus taxes minus employee insurance contributions.
    pub net_wage: PeriodAmount,
    /// Sum of the employer's insurance contributions.
    pub employer_insurance_total: PeriodAmount,
    /// Employer levies.
    pub levies: LevyAmounts,
    /// Gross plus employer contributions plus levies.
    pub employer_total_cost: PeriodAmount,
    /// The underlying wage-tax computation, including its audit trail.
    pub tax_details: WageTaxResult,
}

impl NetWageReport {
    /// Total taxes withheld (wage tax, surcharge and church tax).
    pub fn total_taxes(&self) -> PeriodAmount {
        self.wage_tax + self.solidarity_surcharge + self.church_tax
    }
}
