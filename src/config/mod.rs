//! Year rule data for the wage-tax engine.
//!
//! Every accounting year carries its own tariff, allowances, relief tables
//! and social insurance parameters. They are loaded from YAML files into a
//! [`RuleBook`] and looked up once per computation.
//!
//! # Example
//!
//! ```no_run
//! use wage_tax_engine::config::RuleBook;
//!
//! let book = RuleBook::load("./config/years").unwrap();
//! println!("Loaded {} years", book.years().count());
//! ```

mod loader;
mod types;

pub use loader::RuleBook;
pub use types::{
    CareRates, ContributionCeilings, IncomeTaxRules, PrecautionRules, ReliefTables,
    SocialInsuranceRules, SolidarityRules, TariffCoefficients, YearRuleSet,
};
