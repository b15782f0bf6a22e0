//! Error types for the wage-tax engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading year rules or
//! computing withholding and contributions.

use thiserror::Error;

/// The main error type for the wage-tax engine.
///
/// Configuration errors (unsupported year, missing or broken rule data) are
/// fatal for the computation that hit them. Statutory floors are never
/// reported as errors; the engine clamps those amounts to zero instead.
///
/// # Example
///
/// ```
/// use wage_tax_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedYear { year: 2018 };
/// assert_eq!(error.to_string(), "Unsupported accounting year: 2018");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The accounting year is outside the range the engine knows.
    #[error("Unsupported accounting year: {year}")]
    UnsupportedYear {
        /// The requested year.
        year: u16,
    },

    /// The year is supported but no rule data was loaded for it.
    #[error("No rule data loaded for accounting year {year}")]
    MissingYearRules {
        /// The requested year.
        year: u16,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Year rule data parsed but is internally inconsistent.
    #[error("Invalid rule set for {year}: {message}")]
    InvalidRuleSet {
        /// The accounting year of the broken rule set.
        year: u16,
        /// What is inconsistent.
        message: String,
    },

    /// A boundary input could not be mapped onto the domain model.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested computation path is not implemented.
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation {
        /// A description of the unsupported path.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
