//! Request handlers for the gross-to-net calculator.
//!
//! The handlers sit between a presentation layer and the
//! [`GrossToNetOrchestrator`]: they validate the request, run the
//! calculation and flatten the report, turning every failure into an
//! [`ApiError`].

use std::time::Instant;

use serde_json::error::Category;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::GrossToNetOrchestrator;
use crate::models::GrossToNetInput;

use super::request::CalculationRequest;
use super::response::{ApiError, CalculationResponse};

/// Handles a decoded calculation request.
pub fn handle_calculation(
    orchestrator: &GrossToNetOrchestrator,
    request: CalculationRequest,
) -> Result<CalculationResponse, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        year = request.year,
        tax_class = request.tax_class,
        "Processing calculation request"
    );

    let input = match GrossToNetInput::try_from(request) {
        Ok(input) => input,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
            return Err(err.into());
        }
    };

    let start_time = Instant::now();
    match orchestrator.compute(&input) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                net_monthly = %report.net_wage.monthly,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            Ok(CalculationResponse::from(&report))
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Calculation failed");
            Err(err.into())
        }
    }
}

/// Handles a calculation request given as a JSON document.
///
/// A missing required field is reported as `VALIDATION_ERROR`, any other
/// decoding failure as `MALFORMED_JSON`.
pub fn handle_json(
    orchestrator: &GrossToNetOrchestrator,
    body: &str,
) -> Result<CalculationResponse, ApiError> {
    let request: CalculationRequest = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "Failed to decode calculation request");
        match err.classify() {
            Category::Data if err.to_string().contains("missing field") => {
                ApiError::validation_error(err.to_string())
            }
            Category::Data => ApiError::malformed_json(err.to_string()),
            Category::Syntax | Category::Eof => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            Category::Io => ApiError::malformed_json("Failed to read request body"),
        }
    })?;
    handle_calculation(orchestrator, request)
}
