//! The engine's public entry points.
//!
//! [`LoanEngine`] owns the loaded configuration and exposes the two
//! operations callers need: scoring an applicant under a named policy and
//! calculating a loan installment.

use std::path::Path;

use rust_decimal::Decimal;

use crate::calculation::{amortization_schedule, compute_emi, score};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AmortizationResult, ApplicantProfile, LoanTerms, ScheduleEntry, ScoreResult};

/// Scores applicants and amortizes loans against a loaded configuration.
///
/// The engine holds no mutable state; a single instance can serve any number
/// of concurrent callers.
///
/// # Example
///
/// ```
/// use loan_risk_engine::LoanEngine;
/// use loan_risk_engine::models::{ApplicantProfile, CreditHistory, RiskCategory};
/// use rust_decimal::Decimal;
///
/// let engine = LoanEngine::load("./config").unwrap();
///
/// let profile = ApplicantProfile::new(
///     Decimal::from(35_000),
///     Decimal::from(250_000),
///     CreditHistory::Good,
/// );
/// let result = engine.evaluate_application(&profile, "threshold").unwrap();
/// assert_eq!(result.score, 70);
/// assert_eq!(result.category, RiskCategory::Low);
///
/// let emi = engine
///     .calculate_installment(Decimal::from(100_000), Decimal::from(10), Decimal::ONE)
///     .unwrap();
/// assert_eq!(emi.months, 12);
/// ```
#[derive(Debug, Clone)]
pub struct LoanEngine {
    config: ConfigLoader,
}

impl LoanEngine {
    /// Creates an engine from an already-loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self { config }
    }

    /// Loads configuration from `path` and creates an engine.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        ConfigLoader::load(path).map(Self::new)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Validates `profile` and scores it under the policy named `policy_name`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
    ///   for a negative amount.
    /// - [`EngineError::PolicyNotFound`](crate::error::EngineError::PolicyNotFound)
    ///   for an unknown policy.
    /// - [`EngineError::PolicyCoverageGap`](crate::error::EngineError::PolicyCoverageGap)
    ///   when the policy does not cover the applicant.
    pub fn evaluate_application(
        &self,
        profile: &ApplicantProfile,
        policy_name: &str,
    ) -> EngineResult<ScoreResult> {
        profile.validate()?;
        let policy = self.config.policy(policy_name)?;
        score(profile, policy)
    }

    /// Calculates the monthly installment for a loan.
    pub fn calculate_installment(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        tenure_years: Decimal,
    ) -> EngineResult<AmortizationResult> {
        let terms = LoanTerms::new(principal, annual_rate_percent, tenure_years);
        compute_emi(&terms, self.config.amortization())
    }

    /// Builds the month-by-month repayment schedule for a loan.
    pub fn repayment_schedule(&self, terms: &LoanTerms) -> EngineResult<Vec<ScheduleEntry>> {
        amortization_schedule(terms, self.config.amortization())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::CreditHistory;

    fn engine() -> LoanEngine {
        LoanEngine::load("./config").expect("Failed to load config")
    }

    #[test]
    fn test_evaluate_rejects_negative_income_before_scoring() {
        let profile = ApplicantProfile::new(Decimal::from(-1), Decimal::ZERO, CreditHistory::Good);
        let err = engine().evaluate_application(&profile, "threshold").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_evaluate_unknown_policy() {
        let profile = ApplicantProfile::new(Decimal::ONE, Decimal::ONE, CreditHistory::Good);
        let err = engine().evaluate_application(&profile, "nonexistent").unwrap_err();
        assert!(matches!(err, EngineError::PolicyNotFound { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_calculate_installment_rejects_zero_rate() {
        let err = engine()
            .calculate_installment(Decimal::from(1000), Decimal::ZERO, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, EngineError::DegenerateAmortizationInput { .. }));
    }

    #[test]
    fn test_repayment_schedule_length_matches_months() {
        let terms = LoanTerms::new(Decimal::from(10_000), Decimal::from(9), Decimal::TWO);
        let schedule = engine().repayment_schedule(&terms).unwrap();
        assert_eq!(schedule.len(), 24);
    }
}
