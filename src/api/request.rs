//! Request types for the Loan Risk Engine API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ApplicantProfile, LoanTerms};

/// Request body for the `/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Name of the policy to score under (e.g. "threshold").
    pub policy: String,
    /// The applicant to score.
    pub profile: ApplicantProfile,
}

/// Request body for the `/emi` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiRequest {
    /// The amount borrowed.
    pub principal: Decimal,
    /// Nominal annual rate in percent.
    pub annual_rate_percent: Decimal,
    /// Tenure in years.
    pub tenure_years: Decimal,
    /// Include the month-by-month schedule in the response.
    #[serde(default)]
    pub include_schedule: bool,
}

impl From<&EmiRequest> for LoanTerms {
    fn from(req: &EmiRequest) -> Self {
        LoanTerms::new(req.principal, req.annual_rate_percent, req.tenure_years)
    }
}
