//! Calculation logic for the wage-tax engine.
//!
//! This module contains the decimal rounding helpers, the stages of the
//! withholding procedure (contribution rates, annualization, reliefs, fixed
//! deductions, precaution allowance, tariff, solidarity surcharge and church
//! tax), the [`WageTaxEngine`] that runs them in order, the
//! [`InsuranceCalculator`] for social insurance contributions, and the
//! [`GrossToNetOrchestrator`] that combines both into a report.

mod allowances;
mod annualization;
mod contribution_rates;
mod gross_to_net;
mod insurance;
mod other_payments;
mod precaution_allowance;
mod relief;
mod rounding;
mod surcharge;
mod tariff;
mod wage_tax;

pub use allowances::{FixedDeductions, NetAnnualWage, fixed_deductions, net_annual_wage};
pub use annualization::{annualize, apportion};
pub use contribution_rates::{
    CareSplit, ContributionRates, care_split, discounted_children, setup_contribution_rates,
};
pub use gross_to_net::GrossToNetOrchestrator;
pub use insurance::InsuranceCalculator;
pub use other_payments::other_payments_tax;
pub use precaution_allowance::{PrecautionAllowance, precaution_allowance};
pub use relief::{AgeRelief, PensionRelief, age_relief, pension_relief};
pub use rounding::{div_down, floor_at_zero, percent_of, round_down, round_half_down, round_up};
pub use surcharge::{SOLIDARITY_RATE, SolidaritySurcharge, church_tax, solidarity_surcharge};
pub use tariff::{TariffZone, class_five_six_tax, income_tax_tariff, per_unit_income, tariff_zone};
pub use wage_tax::WageTaxEngine;
