//! HTTP request handlers for the Loan Risk Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{LoanTerms, ScheduleEntry};

use super::request::{EmiRequest, EvaluationRequest};
use super::response::{ApiError, ApiErrorResponse, EmiResponse, EvaluationResponse, PolicyInfo};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/policies", get(policies_handler))
        .route("/evaluate", post(evaluate_handler))
        .route("/emi", post(emi_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::invalid_input(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Handler for GET /policies.
async fn policies_handler(State(state): State<AppState>) -> impl IntoResponse {
    let policies: Vec<PolicyInfo> = state
        .engine()
        .config()
        .policies()
        .map(PolicyInfo::from)
        .collect();
    json_response(StatusCode::OK, policies)
}

/// Handler for POST /evaluate endpoint.
///
/// Scores the applicant under the requested policy.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match state
        .engine()
        .evaluate_application(&request.profile, &request.policy)
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                policy = %result.policy,
                policy_version = %result.policy_version,
                score = result.score,
                decision = ?result.decision,
                duration_us = start_time.elapsed().as_micros(),
                "Evaluation completed successfully"
            );
            json_response(
                StatusCode::OK,
                EvaluationResponse {
                    evaluation_id: correlation_id,
                    timestamp: Utc::now(),
                    engine_version: env!("CARGO_PKG_VERSION").to_string(),
                    result,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                policy = %request.policy,
                error = %err,
                "Evaluation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /emi endpoint.
///
/// Returns display-rounded amounts and, on request, the repayment schedule.
async fn emi_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmiRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing EMI request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let engine = state.engine();
    let places = engine.config().amortization().display_decimal_places;
    let terms = LoanTerms::from(&request);

    let result = engine
        .calculate_installment(terms.principal, terms.annual_rate_percent, terms.tenure_years)
        .and_then(|result| {
            let schedule: Option<Vec<ScheduleEntry>> = if request.include_schedule {
                Some(
                    engine
                        .repayment_schedule(&terms)?
                        .iter()
                        .map(|entry| entry.rounded(places))
                        .collect(),
                )
            } else {
                None
            };
            Ok((result, schedule))
        });

    match result {
        Ok((result, schedule)) => {
            info!(
                correlation_id = %correlation_id,
                months = result.months,
                method = ?result.method,
                "EMI calculated"
            );
            json_response(
                StatusCode::OK,
                EmiResponse {
                    summary: result.rounded(places),
                    schedule,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "EMI calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LoanEngine;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let engine = LoanEngine::load("./config").expect("Failed to load config");
        AppState::new(engine)
    }

    async fn post_json(uri: &str, body: String) -> (StatusCode, Vec<u8>) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_evaluate_valid_request_returns_200() {
        let body = r#"{
            "policy": "threshold",
            "profile": {"monthly_income": 60000, "loan_amount": 100000, "credit_history": 1}
        }"#;

        let (status, bytes) = post_json("/evaluate", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let response: EvaluationResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response.result.score, 100);
        assert_eq!(response.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_evaluate_malformed_json_returns_400() {
        let (status, bytes) = post_json("/evaluate", "{invalid json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_evaluate_bad_credit_flag_returns_invalid_input() {
        let body = r#"{
            "policy": "threshold",
            "profile": {"monthly_income": 60000, "loan_amount": 100000, "credit_history": 7}
        }"#;

        let (status, bytes) = post_json("/evaluate", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_emi_returns_rounded_amounts() {
        let body = r#"{"principal": 100000, "annual_rate_percent": 10, "tenure_years": 1}"#;

        let (status, bytes) = post_json("/emi", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let response: EmiResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response.summary.installment, Decimal::from_str("8791.59").unwrap());
        assert_eq!(response.summary.total_payable, Decimal::from_str("105499.06").unwrap());
        assert!(response.schedule.is_none());
    }

    #[tokio::test]
    async fn test_emi_zero_tenure_returns_degenerate_error() {
        let body = r#"{"principal": 100000, "annual_rate_percent": 10, "tenure_years": 0}"#;

        let (status, bytes) = post_json("/emi", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "DEGENERATE_AMORTIZATION_INPUT");
    }
}
