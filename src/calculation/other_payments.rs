//! Other payments (sonstige Bezüge).
//!
//! Only the case without other payments is supported; it yields zero tax.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::TaxFigures;

/// Taxes on the other payments of a pay period.
///
/// Returns zeros when `amount` is zero and
/// [`EngineError::UnsupportedOperation`] otherwise.
pub fn other_payments_tax(amount: Decimal) -> EngineResult<TaxFigures> {
    if amount.is_zero() {
        Ok(TaxFigures::default())
    } else {
        Err(EngineError::UnsupportedOperation {
            message: format!("taxation of other payments ({}) is not supported", amount),
        })
    }
}
