//! Core data models for the wage-tax engine.
//!
//! This module contains all the domain models used throughout the engine.

mod accounting_year;
mod calculation_result;
mod insurance_result;
mod profile;
mod report;
mod wage;

pub use accounting_year::AccountingYear;
pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, TaxFigures, WageTaxResult};
pub use insurance_result::{BranchContribution, InsuranceResult, PeriodAmount};
pub use profile::{
    FederalState, HealthInsurance, PensionIncome, PensionInsurance, TaxClass, TaxpayerProfile,
};
pub use report::{EmployerLevies, GrossToNetInput, LevyAmounts, NetWageReport};
pub use wage::{GrossWage, PayPeriod};
