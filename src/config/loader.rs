//! Rule book loading functionality.
//!
//! This module provides the [`RuleBook`] type, which loads one
//! [`YearRuleSet`] per accounting year from YAML files and hands them out
//! by year.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::AccountingYear;

use super::types::YearRuleSet;

/// Year files compiled into the crate.
const BUILTIN_YEARS: [(&str, &str); 7] = [
    ("2019.yaml", include_str!("../../config/years/2019.yaml")),
    ("2020.yaml", include_str!("../../config/years/2020.yaml")),
    ("2021.yaml", include_str!("../../config/years/2021.yaml")),
    ("2022.yaml", include_str!("../../config/years/2022.yaml")),
    ("2023.yaml", include_str!("../../config/years/2023.yaml")),
    ("2024.yaml", include_str!("../../config/years/2024.yaml")),
    ("2025.yaml", include_str!("../../config/years/2025.yaml")),
];

/// Holds the validated rule sets of all loaded accounting years.
///
/// # Directory Structure
///
/// ```text
/// config/years/
/// ├── 2019.yaml
/// ├── ...
/// └── 2025.yaml
/// ```
///
/// Each file carries its own `year` field; file names are not interpreted.
///
/// # Example
///
/// ```
/// use wage_tax_engine::config::RuleBook;
/// use wage_tax_engine::models::AccountingYear;
///
/// let book = RuleBook::builtin()?;
/// let rules = book.get(AccountingYear::Y2025)?;
/// assert_eq!(rules.year, 2025);
/// # Ok::<(), wage_tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: BTreeMap<AccountingYear, YearRuleSet>,
}

impl RuleBook {
    /// Loads every `*.yaml` file in the given directory.
    ///
    /// Returns `ConfigNotFound` when the directory is missing or holds no
    /// year files, `ConfigParseError` for malformed YAML, and
    /// `UnsupportedYear` / `InvalidRuleSet` for unusable rule data.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let dir_str = path.display().to_string();

        let entries = fs::read_dir(path).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut rule_sets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let file = entry.path();
            if file.extension().is_some_and(|ext| ext == "yaml") {
                let file_str = file.display().to_string();
                let content =
                    fs::read_to_string(&file).map_err(|_| EngineError::ConfigNotFound {
                        path: file_str.clone(),
                    })?;
                rule_sets.push(Self::parse_yaml(&file_str, &content)?);
            }
        }

        if rule_sets.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no year files found)", dir_str),
            });
        }

        Self::from_rule_sets(rule_sets)
    }

    /// Builds the rule book from the year files compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        let rule_sets = BUILTIN_YEARS
            .iter()
            .map(|(name, content)| Self::parse_yaml(name, content))
            .collect::<EngineResult<Vec<_>>>()?;

        Self::from_rule_sets(rule_sets)
    }

    /// Validates and indexes already-deserialized rule sets.
    pub fn from_rule_sets(rule_sets: Vec<YearRuleSet>) -> EngineResult<Self> {
        let mut rules = BTreeMap::new();
        for rule_set in rule_sets {
            let year = AccountingYear::try_from(rule_set.year)?;
            rule_set.validate()?;
            debug!(year = rule_set.year, "Loaded year rule set");
            rules.insert(year, rule_set);
        }
        Ok(Self { rules })
    }

    fn parse_yaml(path: &str, content: &str) -> EngineResult<YearRuleSet> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the rule set of an accounting year.
    pub fn get(&self, year: AccountingYear) -> EngineResult<&YearRuleSet> {
        self.rules
            .get(&year)
            .ok_or(EngineError::MissingYearRules { year: year.value() })
    }

    /// Returns the rule set of a year, falling back to the most recent
    /// loaded year when the requested year is not supported.
    ///
    /// This is a compatibility policy for callers that prefer a current
    /// result over an error; the fallback is logged. A supported year with
    /// no loaded data is still an error.
    pub fn get_or_latest(&self, year: u16) -> EngineResult<&YearRuleSet> {
        match AccountingYear::try_from(year) {
            Ok(known) => self.get(known),
            Err(_) => {
                let latest = self.latest()?;
                warn!(
                    requested = year,
                    fallback = latest.year,
                    "Unsupported accounting year, using most recent rules"
                );
                Ok(latest)
            }
        }
    }

    /// Returns the rule set of the most recent loaded year.
    pub fn latest(&self) -> EngineResult<&YearRuleSet> {
        self.rules
            .values()
            .next_back()
            .ok_or(EngineError::MissingYearRules {
                year: AccountingYear::latest().value(),
            })
    }

    /// Returns the loaded years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = AccountingYear> + '_ {
        self.rules.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_loads_all_supported_years() {
        let book = RuleBook::builtin().unwrap();
        let years: Vec<_> = book.years().collect();
        assert_eq!(years, AccountingYear::ALL.to_vec());
    }

    #[test]
    fn test_load_reads_config_directory() {
        let book = RuleBook::load("./config/years").unwrap();
        assert_eq!(book.years().count(), 7);
        assert_eq!(
            book.get(AccountingYear::Y2023).unwrap().income_tax.basic_allowance,
            dec!(10908)
        );
    }

    #[test]
    fn test_load_missing_directory_fails() {
        let result = RuleBook::load("./config/does-not-exist");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_parse_error_reports_path() {
        let result = RuleBook::parse_yaml("broken.yaml", "year: [not a number");
        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "broken.yaml"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_get_missing_year_is_configuration_error() {
        let book = RuleBook::builtin().unwrap();
        let only_2025 = book.get(AccountingYear::Y2025).unwrap().clone();
        let book = RuleBook::from_rule_sets(vec![only_2025]).unwrap();

        let result = book.get(AccountingYear::Y2019);
        assert!(matches!(
            result,
            Err(EngineError::MissingYearRules { year: 2019 })
        ));
    }

    #[test]
    fn test_rule_set_for_unsupported_year_is_rejected() {
        let book = RuleBook::builtin().unwrap();
        let mut rules = book.get(AccountingYear::Y2025).unwrap().clone();
        rules.year = 2031;

        let result = RuleBook::from_rule_sets(vec![rules]);
        assert!(matches!(
            result,
            Err(EngineError::UnsupportedYear { year: 2031 })
        ));
    }

    #[test]
    fn test_get_or_latest_falls_back_for_unknown_year() {
        let book = RuleBook::builtin().unwrap();
        assert_eq!(book.get_or_latest(2031).unwrap().year, 2025);
        assert_eq!(book.get_or_latest(2021).unwrap().year, 2021);
    }

    #[test]
    fn test_relief_tables_have_equal_length() {
        let book = RuleBook::builtin().unwrap();
        let mut rules = book.get(AccountingYear::Y2020).unwrap().clone();
        rules.relief_tables.age_relief_max.pop();

        let result = rules.validate();
        assert!(matches!(result, Err(EngineError::InvalidRuleSet { .. })));
    }

    #[test]
    fn test_relief_index_is_capped() {
        let book = RuleBook::builtin().unwrap();
        let tables = &book.get(AccountingYear::Y2023).unwrap().relief_tables;
        assert_eq!(tables.index_for(1999), 0);
        assert_eq!(tables.index_for(2023), 18);
        assert_eq!(tables.index_for(2090), 35);

        let tables = &book.get(AccountingYear::Y2025).unwrap().relief_tables;
        assert_eq!(tables.index_for(2090), 53);
    }

    #[test]
    fn test_child_discount_tiers_start_in_2024() {
        let book = RuleBook::builtin().unwrap();
        for year in book.years() {
            let rules = book.get(year).unwrap();
            assert_eq!(
                rules.supports_child_discount_tiers,
                year >= AccountingYear::Y2024,
                "unexpected tier flag for {}",
                year
            );
        }
    }

    #[test]
    fn test_pension_deductible_share_follows_phase_in() {
        let book = RuleBook::builtin().unwrap();
        let expected = [
            (AccountingYear::Y2019, dec!(0.76)),
            (AccountingYear::Y2020, dec!(0.80)),
            (AccountingYear::Y2021, dec!(0.84)),
            (AccountingYear::Y2022, dec!(0.88)),
            (AccountingYear::Y2023, dec!(1.00)),
            (AccountingYear::Y2024, dec!(1.00)),
            (AccountingYear::Y2025, dec!(1.00)),
        ];
        for (year, share) in expected {
            let rules = book.get(year).unwrap();
            assert_eq!(
                rules.precaution.pension_deductible_share, share,
                "unexpected deductible share for {}",
                year
            );
        }
    }
}
