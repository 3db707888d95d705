//! HTTP API module for the Loan Risk Engine.
//!
//! This module provides the REST API endpoints for scoring applicants and
//! calculating loan installments.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmiRequest, EvaluationRequest};
pub use response::{ApiError, ApiErrorResponse, EmiResponse, EvaluationResponse, PolicyInfo};
pub use state::AppState;
