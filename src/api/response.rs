//! Response types for the Loan Risk Engine API.
//!
//! This module defines the success envelopes returned by each endpoint and
//! the error response structures for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PolicyTable;
use crate::error::EngineError;
use crate::models::{AmortizationSummary, ScheduleEntry, ScoreResult};

/// Response body for `/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Identifier for this evaluation.
    pub evaluation_id: Uuid,
    /// When the evaluation ran.
    pub timestamp: DateTime<Utc>,
    /// Engine version that produced the result.
    pub engine_version: String,
    /// The scoring outcome.
    pub result: ScoreResult,
}

/// Response body for `/emi`. Amounts are rounded for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiResponse {
    /// Installment and totals.
    #[serde(flatten)]
    pub summary: AmortizationSummary,
    /// Month-by-month schedule, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleEntry>>,
}

/// One entry of the `/policies` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyInfo {
    /// Policy name.
    pub name: String,
    /// Policy version.
    pub version: String,
    /// Policy description.
    pub description: String,
    /// Number of factors.
    pub factors: usize,
}

impl From<&PolicyTable> for PolicyInfo {
    fn from(policy: &PolicyTable) -> Self {
        Self {
            name: policy.name.clone(),
            version: policy.version.clone(),
            description: policy.description.clone(),
            factors: policy.factors.len(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

    /// Creates an invalid input error response.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("INVALID_INPUT", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidPolicy { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::PolicyNotFound { name } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "POLICY_NOT_FOUND",
                    message,
                    format!("The policy '{}' is not loaded by this engine", name),
                ),
            },
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("INVALID_INPUT", message, field),
            },
            EngineError::DegenerateAmortizationInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("DEGENERATE_AMORTIZATION_INPUT", message, field),
            },
            EngineError::PolicyCoverageGap { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "POLICY_COVERAGE_GAP",
                    message,
                    "The policy table does not cover this applicant and must be fixed",
                ),
            },
            EngineError::CalculationError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
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
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_policy_not_found_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::PolicyNotFound {
            name: "legacy".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "POLICY_NOT_FOUND");
        assert!(api_error.error.message.contains("legacy"));
    }

    #[test]
    fn test_coverage_gap_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::PolicyCoverageGap {
            policy: "threshold".to_string(),
            factor: "income".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "POLICY_COVERAGE_GAP");
    }

    #[test]
    fn test_degenerate_input_names_field() {
        let api_error: ApiErrorResponse =
            EngineError::degenerate("tenure_years", "must be greater than zero").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.details.as_deref(), Some("tenure_years"));
    }

    #[test]
    fn test_error_response_carries_status_and_json_body() {
        let response = ApiErrorResponse::from(EngineError::invalid_input(
            "monthly_income",
            "must not be negative",
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
