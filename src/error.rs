//! Error types for the Loan Risk Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the scoring engine and the amortization calculator can
//! report.

use thiserror::Error;

/// The main error type for the Loan Risk Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use loan_risk_engine::error::EngineError;
///
/// let error = EngineError::PolicyNotFound {
///     name: "legacy".to_string(),
/// };
/// assert_eq!(error.to_string(), "Scoring policy not found: legacy");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A policy table was structurally malformed and was rejected at load.
    #[error("Invalid policy '{policy}': {message}")]
    InvalidPolicy {
        /// The name of the rejected policy.
        policy: String,
        /// What made the table invalid.
        message: String,
    },

    /// The requested policy name is not among the loaded policies.
    #[error("Scoring policy not found: {name}")]
    PolicyNotFound {
        /// The unrecognized policy name.
        name: String,
    },

    /// An applicant or loan field was missing, non-numeric or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Rate or tenure passed to the calculator cannot be amortized.
    #[error("Degenerate amortization input '{field}': {message}")]
    DegenerateAmortizationInput {
        /// The offending field.
        field: String,
        /// A description of the violated precondition.
        message: String,
    },

    /// No branch of a policy factor matched the applicant.
    #[error("Policy '{policy}' has a coverage gap in factor '{factor}'")]
    PolicyCoverageGap {
        /// The policy being evaluated.
        policy: String,
        /// The factor whose branches did not cover the input.
        factor: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's input rather than by
    /// configuration or policy authoring.
    ///
    /// An unknown policy name counts as caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. }
                | EngineError::PolicyNotFound { .. }
                | EngineError::DegenerateAmortizationInput { .. }
        )
    }

    /// Shorthand for an [`EngineError::DegenerateAmortizationInput`].
    pub fn degenerate(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::DegenerateAmortizationInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
