//! Boundary records for the gross-to-net calculator.
//!
//! This module converts the calculator's flat input form into domain types,
//! runs the [`GrossToNetOrchestrator`](crate::calculation::GrossToNetOrchestrator)
//! and flattens its report for a presentation layer.

mod handlers;
mod request;
mod response;

pub use handlers::{handle_calculation, handle_json};
pub use request::{CalculationRequest, MAX_GROSS_WAGE};
pub use response::{ApiError, CalculationResponse};
