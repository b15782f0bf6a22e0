//! Income tax tariff (§ 32a EStG) and the class V/VI procedure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{div_down, round_down};
use crate::config::IncomeTaxRules;

/// The tariff zone a per-unit taxable income falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffZone {
    /// Up to the basic allowance; no tax.
    BasicAllowance,
    /// First progressive zone.
    FirstProgressive,
    /// Second progressive zone.
    SecondProgressive,
    /// Proportional 42% zone.
    Proportional42,
    /// Proportional 45% zone.
    Proportional45,
}

fn rate_42() -> Decimal {
    Decimal::new(42, 2)
}

fn rate_45() -> Decimal {
    Decimal::new(45, 2)
}

/// Determines the tariff zone of a per-unit taxable income in whole euros.
pub fn tariff_zone(rules: &IncomeTaxRules, income: Decimal) -> TariffZone {
    let tariff = &rules.tariff;
    if income < rules.basic_allowance + Decimal::ONE {
        TariffZone::BasicAllowance
    } else if income < tariff.first_zone_end + Decimal::ONE {
        TariffZone::FirstProgressive
    } else if income < tariff.second_zone_end + Decimal::ONE {
        TariffZone::SecondProgressive
    } else if income < tariff.third_zone_end + Decimal::ONE {
        TariffZone::Proportional42
    } else {
        TariffZone::Proportional45
    }
}

/// Applies the four-zone tariff to a per-unit income and multiplies by the
/// splitting factor.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_tax_engine::calculation::income_tax_tariff;
/// use wage_tax_engine::config::RuleBook;
/// use wage_tax_engine::models::AccountingYear;
///
/// let book = RuleBook::builtin().unwrap();
/// let rules = &book.get(AccountingYear::Y2023).unwrap().income_tax;
/// assert_eq!(income_tax_tariff(rules, dec!(27903), dec!(1)), dec!(4092));
/// assert_eq!(income_tax_tariff(rules, dec!(10908), dec!(1)), dec!(0));
/// ```
pub fn income_tax_tariff(rules: &IncomeTaxRules, income: Decimal, splitting_factor: Decimal) -> Decimal {
    let tariff = &rules.tariff;
    let ten_thousand = Decimal::from(10_000);
    let tax = match tariff_zone(rules, income) {
        TariffZone::BasicAllowance => Decimal::ZERO,
        TariffZone::FirstProgressive => {
            let y = round_down((income - rules.basic_allowance) / ten_thousand, 6);
            round_down((y * tariff.first_zone_quadratic + tariff.first_zone_linear) * y, 0)
        }
        TariffZone::SecondProgressive => {
            let y = round_down((income - tariff.first_zone_end) / ten_thousand, 6);
            let rw = (y * tariff.second_zone_quadratic + tariff.second_zone_linear) * y;
            round_down(rw + tariff.second_zone_base, 0)
        }
        TariffZone::Proportional42 => round_down(income * rate_42() - tariff.third_zone_offset, 0),
        TariffZone::Proportional45 => round_down(income * rate_45() - tariff.fourth_zone_offset, 0),
    };
    tax * splitting_factor
}

/// Tax on a reference income in classes V and VI without the flat splices.
///
/// Twice the tariff difference between 125% and 75% of the income, at
/// least 14% of the income.
fn reference_tax(rules: &IncomeTaxRules, income: Decimal) -> Decimal {
    let high = income_tax_tariff(rules, round_down(income * Decimal::new(125, 2), 2), Decimal::ONE);
    let low = income_tax_tariff(rules, round_down(income * Decimal::new(75, 2), 2), Decimal::ONE);
    let difference = (high - low) * Decimal::TWO;
    let minimum = round_down(income * Decimal::new(14, 2), 0);
    minimum.max(difference)
}

/// Computes the annual tax of tax classes V and VI.
///
/// Above the second limit the tax is spliced from the reference tax at that
/// limit and the flat 42%/45% rates. Between the first and second limit the
/// lower of the reference tax and the 42% splice from the first limit
/// applies.
pub fn class_five_six_tax(rules: &IncomeTaxRules, income: Decimal) -> Decimal {
    let [w1, w2, w3] = rules.class_five_six_limits;
    if income > w2 {
        let base = reference_tax(rules, w2);
        if income > w3 {
            let tax = round_down(base + (w3 - w2) * rate_42(), 0);
            round_down(tax + (income - w3) * rate_45(), 0)
        } else {
            round_down(base + (income - w2) * rate_42(), 0)
        }
    } else {
        let tax = reference_tax(rules, income);
        if income > w1 {
            let spliced = round_down(reference_tax(rules, w1) + (income - w1) * rate_42(), 0);
            spliced.min(tax)
        } else {
            tax
        }
    }
}

/// Per-unit taxable income: the taxable income divided by the splitting
/// factor, in whole euros. Incomes below one euro count as zero.
pub fn per_unit_income(taxable_income: Decimal, splitting_factor: Decimal) -> Decimal {
    if taxable_income < Decimal::ONE {
        Decimal::ZERO
    } else {
        div_down(taxable_income, splitting_factor, 0)
    }
}
