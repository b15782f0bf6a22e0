//! Accounting year model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An accounting year the engine has statutory rules for.
///
/// # Example
///
/// ```
/// use wage_tax_engine::models::AccountingYear;
///
/// let year = AccountingYear::try_from(2024).unwrap();
/// assert_eq!(year, AccountingYear::Y2024);
/// assert!(AccountingYear::try_from(2018).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AccountingYear {
    /// 2019.
    Y2019,
    /// 2020.
    Y2020,
    /// 2021.
    Y2021,
    /// 2022.
    Y2022,
    /// 2023.
    Y2023,
    /// 2024.
    Y2024,
    /// 2025.
    Y2025,
}

impl AccountingYear {
    /// All supported years in ascending order.
    pub const ALL: [AccountingYear; 7] = [
        AccountingYear::Y2019,
        AccountingYear::Y2020,
        AccountingYear::Y2021,
        AccountingYear::Y2022,
        AccountingYear::Y2023,
        AccountingYear::Y2024,
        AccountingYear::Y2025,
    ];

    /// Returns the calendar year.
    pub fn value(self) -> u16 {
        match self {
            AccountingYear::Y2019 => 2019,
            AccountingYear::Y2020 => 2020,
            AccountingYear::Y2021 => 2021,
            AccountingYear::Y2022 => 2022,
            AccountingYear::Y2023 => 2023,
            AccountingYear::Y2024 => 2024,
            AccountingYear::Y2025 => 2025,
        }
    }

    /// Returns the most recent supported year.
    pub fn latest() -> Self {
        AccountingYear::Y2025
    }
}

impl TryFrom<u16> for AccountingYear {
    type Error = EngineError;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        AccountingYear::ALL
            .into_iter()
            .find(|y| y.value() == year)
            .ok_or(EngineError::UnsupportedYear { year })
    }
}

impl From<AccountingYear> for u16 {
    fn from(year: AccountingYear) -> Self {
        year.value()
    }
}

impl fmt::Display for AccountingYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_accepts_supported_range() {
        for year in 2019..=2025 {
            assert_eq!(AccountingYear::try_from(year).unwrap().value(), year);
        }
    }

    #[test]
    fn test_try_from_rejects_unsupported_years() {
        assert!(matches!(
            AccountingYear::try_from(2018),
            Err(EngineError::UnsupportedYear { year: 2018 })
        ));
        assert!(AccountingYear::try_from(2026).is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&AccountingYear::Y2023).unwrap(), "2023");
        let year: AccountingYear = serde_json::from_str("2021").unwrap();
        assert_eq!(year, AccountingYear::Y2021);
        assert!(serde_json::from_str::<AccountingYear>("2030").is_err());
    }

    #[test]
    fn test_latest_is_last_of_all() {
        assert_eq!(AccountingYear::latest(), *AccountingYear::ALL.last().unwrap());
    }
}
