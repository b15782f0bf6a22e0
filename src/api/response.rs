//! Response types for the gross-to-net calculator.
//!
//! This module defines the flat [`CalculationResponse`] record and the
//! [`ApiError`] body returned when a calculation cannot be performed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::NetWageReport;

/// Flat gross-to-net figures, every amount stated per month and per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Accounting year.
    pub year: u16,

    /// Gross wage per month.
    pub gross_monthly: Decimal,
    /// Gross wage per year.
    pub gross_yearly: Decimal,

    /// Income tax per month.
    pub income_tax_monthly: Decimal,
    /// Income tax per year.
    pub income_tax_yearly: Decimal,
    /// Solidarity surcharge per month.
    pub solidarity_surcharge_monthly: Decimal,
    /// Solidarity surcharge per year.
    pub solidarity_surcharge_yearly: Decimal,
    /// Church tax per month.
    pub church_tax_monthly: Decimal,
    /// Church tax per year.
    pub church_tax_yearly: Decimal,
    /// Church tax rate in percent.
    pub church_tax_rate: Decimal,

    /// Employee health insurance per month.
    pub health_employee_monthly: Decimal,
    /// Employee health insurance per year.
    pub health_employee_yearly: Decimal,
    /// Employee health insurance rate in percent.
    pub health_employee_rate: Decimal,
    /// Employer health insurance per month.
    pub health_employer_monthly: Decimal,
    /// Employer health insurance per year.
    pub health_employer_yearly: Decimal,
    /// Employer health insurance rate in percent.
    pub health_employer_rate: Decimal,

    /// Employee care insurance per month.
    pub care_employee_monthly: Decimal,
    /// Employee care insurance per year.
    pub care_employee_yearly: Decimal,
    /// Employee care insurance rate in percent.
    pub care_employee_rate: Decimal,
    /// Employer care insurance per month.
    pub care_employer_monthly: Decimal,
    /// Employer care insurance per year.
    pub care_employer_yearly: Decimal,
    /// Employer care insurance rate in percent.
    pub care_employer_rate: Decimal,

    /// Employee pension insurance per month.
    pub pension_employee_monthly: Decimal,
    /// Employee pension insurance per year.
    pub pension_employee_yearly: Decimal,
    /// Employee pension insurance rate in percent.
    pub pension_employee_rate: Decimal,
    /// Employer pension insurance per month.
    pub pension_employer_monthly: Decimal,
    /// Employer pension insurance per year.
    pub pension_employer_yearly: Decimal,
    /// Employer pension insurance rate in percent.
    pub pension_employer_rate: Decimal,

    /// Employee unemployment insurance per month.
    pub unemployment_employee_monthly: Decimal,
    /// Employee unemployment insurance per year.
    pub unemployment_employee_yearly: Decimal,
    /// Employee unemployment insurance rate in percent.
    pub unemployment_employee_rate: Decimal,
    /// Employer unemployment insurance per month.
    pub unemployment_employer_monthly: Decimal,
    /// Employer unemployment insurance per year.
    pub unemployment_employer_yearly: Decimal,
    /// Employer unemployment insurance rate in percent.
    pub unemployment_employer_rate: Decimal,

    /// Employee insurance contributions per month.
    pub employee_insurance_monthly: Decimal,
    /// Employee insurance contributions per year.
    pub employee_insurance_yearly: Decimal,
    /// Net wage per month.
    pub net_wage_monthly: Decimal,
    /// Net wage per year.
    pub net_wage_yearly: Decimal,
    /// Employer insurance contributions per month.
    pub employer_insurance_monthly: Decimal,
    /// Employer insurance contributions per year.
    pub employer_insurance_yearly: Decimal,

    /// Illness levy (U1) per month.
    pub u1_levy_monthly: Decimal,
    /// Illness levy (U1) per year.
    pub u1_levy_yearly: Decimal,
    /// Maternity levy (U2) per month.
    pub u2_levy_monthly: Decimal,
    /// Maternity levy (U2) per year.
    pub u2_levy_yearly: Decimal,
    /// Insolvency benefit levy per month.
    pub insolvency_levy_monthly: Decimal,
    /// Insolvency benefit levy per year.
    pub insolvency_levy_yearly: Decimal,

    /// Total employer cost per month.
    pub employer_total_cost_monthly: Decimal,
    /// Total employer cost per year.
    pub employer_total_cost_yearly: Decimal,
}

impl From<&NetWageReport> for CalculationResponse {
    fn from(report: &NetWageReport) -> Self {
        let ins = &report.insurance;
        Self {
            year: report.year.value(),
            gross_monthly: report.gross.monthly,
            gross_yearly: report.gross.yearly,
            income_tax_monthly: report.wage_tax.monthly,
            income_tax_yearly: report.wage_tax.yearly,
            solidarity_surcharge_monthly: report.solidarity_surcharge.monthly,
            solidarity_surcharge_yearly: report.solidarity_surcharge.yearly,
            church_tax_monthly: report.church_tax.monthly,
            church_tax_yearly: report.church_tax.yearly,
            church_tax_rate: report.church_tax_rate,
            health_employee_monthly: ins.health.employee.monthly,
            health_employee_yearly: ins.health.employee.yearly,
            health_employee_rate: ins.health.employee_rate,
            health_employer_monthly: ins.health.employer.monthly,
            health_employer_yearly: ins.health.employer.yearly,
            health_employer_rate: ins.health.employer_rate,
            care_employee_monthly: ins.care.employee.monthly,
            care_employee_yearly: ins.care.employee.yearly,
            care_employee_rate: ins.care.employee_rate,
            care_employer_monthly: ins.care.employer.monthly,
            care_employer_yearly: ins.care.employer.yearly,
            care_employer_rate: ins.care.employer_rate,
            pension_employee_monthly: ins.pension.employee.monthly,
            pension_employee_yearly: ins.pension.employee.yearly,
            pension_employee_rate: ins.pension.employee_rate,
            pension_employer_monthly: ins.pension.employer.monthly,
            pension_employer_yearly: ins.pension.employer.yearly,
            pension_employer_rate: ins.pension.employer_rate,
            unemployment_employee_monthly: ins.unemployment.employee.monthly,
            unemployment_employee_yearly: ins.unemployment.employee.yearly,
            unemployment_employee_rate: ins.unemployment.employee_rate,
            unemployment_employer_monthly: ins.unemployment.employer.monthly,
            unemployment_employer_yearly: ins.unemployment.employer.yearly,
            unemployment_employer_rate: ins.unemployment.employer_rate,
            employee_insurance_monthly: report.employee_insurance_total.monthly,
            employee_insurance_yearly: report.employee_insurance_total.yearly,
            net_wage_monthly: report.net_wage.monthly,
            net_wage_yearly: report.net_wage.yearly,
            employer_insurance_monthly: report.employer_insurance_total.monthly,
            employer_insurance_yearly: report.employer_insurance_total.yearly,
            u1_levy_monthly: report.levies.illness.monthly,
            u1_levy_yearly: report.levies.illness.yearly,
            u2_levy_monthly: report.levies.maternity.monthly,
            u2_levy_yearly: report.levies.maternity.yearly,
            insolvency_levy_monthly: report.levies.insolvency.monthly,
            insolvency_levy_yearly: report.levies.insolvency.yearly,
            employer_total_cost_monthly: report.employer_total_cost.monthly,
            employer_total_cost_yearly: report.employer_total_cost.yearly,
        }
    }
}

/// Error body returned when a calculation cannot be performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Whether the caller can fix the error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.code.as_str(),
            "VALIDATION_ERROR" | "MALFORMED_JSON" | "UNSUPPORTED_YEAR" | "UNSUPPORTED_OPERATION"
        )
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::UnsupportedYear { year } => ApiError::with_details(
                "UNSUPPORTED_YEAR",
                format!("Accounting year {} is not supported", year),
                "Supported accounting years are 2019 to 2025",
            ),
            EngineError::MissingYearRules { year } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("No rule data loaded for {}", year),
            ),
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                format!("Failed to parse {}: {}", path, message),
            ),
            EngineError::InvalidRuleSet { year, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Invalid rule set",
                format!("Rule set for {} is inconsistent: {}", year, message),
            ),
            EngineError::InvalidInput { field, message } => ApiError::with_details(
                "VALIDATION_ERROR",
                format!("Invalid field '{}': {}", field, message),
                "The request contains invalid information",
            ),
            EngineError::UnsupportedOperation { message } => ApiError::with_details(
                "UNSUPPORTED_OPERATION",
                "Unsupported operation",
                message,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_input_maps_to_validation_error() {
        let error: ApiError = EngineError::InvalidInput {
            field: "state".to_string(),
            message: "unknown federal state 'Wien'".to_string(),
        }
        .into();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("state"));
        assert!(error.is_client_error());
    }

    #[test]
    fn test_config_errors_are_not_client_errors() {
        let error: ApiError = EngineError::MissingYearRules { year: 2021 }.into();
        assert_eq!(error.code, "CONFIG_ERROR");
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_unsupported_year_mapping() {
        let error: ApiError = EngineError::UnsupportedYear { year: 2018 }.into();
        assert_eq!(error.code, "UNSUPPORTED_YEAR");
        assert!(error.message.contains("2018"));
    }
}
