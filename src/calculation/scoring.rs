//! Policy-driven applicant scoring.
//!
//! A single evaluation algorithm runs every policy: for each factor the first
//! branch whose predicate matches contributes its points, the contributions
//! are summed, and the total is mapped to a band by the policy's cutoffs.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{
    CoverageGapMode, CutoffBand, Factor, NumericField, PolicyTable, Predicate,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApplicantProfile, AuditWarning, FactorContribution, RiskCategory, ScoreResult,
};

/// Warning code attached to results when a factor had no matching branch.
pub const COVERAGE_GAP_WARNING: &str = "POLICY_COVERAGE_GAP";

impl NumericField {
    /// Reads this field from a profile.
    pub fn read(self, profile: &ApplicantProfile) -> Decimal {
        match self {
            NumericField::MonthlyIncome => profile.monthly_income,
            NumericField::CoapplicantIncome => profile.coapplicant_income,
            NumericField::HouseholdIncome => profile
                .monthly_income
                .saturating_add(profile.coapplicant_income),
            NumericField::LoanAmount => profile.loan_amount,
        }
    }
}

impl Predicate {
    /// Returns true if the profile satisfies this predicate.
    pub fn matches(&self, profile: &ApplicantProfile) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Compare { field, op, value } => op.apply(field.read(profile), *value),
            Predicate::Ratio {
                field,
                op,
                of,
                multiplier,
            } => op.apply(field.read(profile), of.read(profile).saturating_mul(*multiplier)),
            Predicate::CreditHistory { is } => profile.credit_history == *is,
            Predicate::Education { is } => profile.education == Some(*is),
            Predicate::MaritalStatus { is } => profile.marital_status == Some(*is),
        }
    }

    /// Describes the predicate against the profile's actual values.
    pub fn explain(&self, profile: &ApplicantProfile) -> String {
        match self {
            Predicate::Always => "no earlier branch matched".to_string(),
            Predicate::Compare { field, op, value } => format!(
                "{} {} {} {}",
                field.as_str(),
                field.read(profile).normalize(),
                op.symbol(),
                value.normalize()
            ),
            Predicate::Ratio {
                field,
                op,
                of,
                multiplier,
            } => format!(
                "{} {} {} {} x {} ({})",
                field.as_str(),
                field.read(profile).normalize(),
                op.symbol(),
                of.as_str(),
                multiplier.normalize(),
                of.read(profile).saturating_mul(*multiplier).normalize()
            ),
            Predicate::CreditHistory { is } => format!("credit history is {:?}", is),
            Predicate::Education { is } => format!("education is {:?}", is),
            Predicate::MaritalStatus { is } => format!("marital status is {:?}", is),
        }
    }
}

/// Maps a score to the policy band that claims it.
///
/// Bands are closed on their lower bound: a score equal to `min_score`
/// belongs to that band.
///
/// # Example
///
/// ```
/// use loan_risk_engine::calculation::classify;
/// use loan_risk_engine::config::ConfigLoader;
/// use loan_risk_engine::models::RiskCategory;
///
/// let config = ConfigLoader::load("./config").unwrap();
/// let policy = config.policy("threshold").unwrap();
///
/// assert_eq!(classify(70, policy).0, RiskCategory::Low);
/// assert_eq!(classify(69, policy).0, RiskCategory::Medium);
/// assert_eq!(classify(39, policy).0, RiskCategory::High);
/// ```
pub fn classify(score: i64, policy: &PolicyTable) -> (RiskCategory, &str) {
    policy
        .cutoffs
        .iter()
        .find(|band| score >= band.min_score)
        .map(|CutoffBand { category, label, .. }| (*category, label.as_str()))
        .unwrap_or((policy.otherwise.category, policy.otherwise.label.as_str()))
}

fn evaluate_factor(
    factor: &Factor,
    profile: &ApplicantProfile,
) -> Option<FactorContribution> {
    factor
        .branches
        .iter()
        .position(|branch| branch.when.matches(profile))
        .map(|index| {
            let branch = &factor.branches[index];
            FactorContribution {
                factor_id: factor.id.clone(),
                factor_name: factor.name.clone(),
                branch_index: Some(index),
                points: branch.points,
                reasoning: format!(
                    "{}: {} => {} points",
                    factor.name,
                    branch.when.explain(profile),
                    branch.points
                ),
            }
        })
}

/// Scores an applicant under a policy.
///
/// The result depends only on `profile` and `policy`. The profile is assumed
/// to be validated by the caller; see [`ApplicantProfile::validate`].
///
/// # Errors
///
/// Returns [`EngineError::PolicyCoverageGap`] when a factor has no matching
/// branch and the policy's `on_coverage_gap` is `fail`. With `warn`, the factor
/// contributes zero and the result carries a [`COVERAGE_GAP_WARNING`].
///
/// # Example
///
/// ```
/// use loan_risk_engine::calculation::score;
/// use loan_risk_engine::config::ConfigLoader;
/// use loan_risk_engine::models::{ApplicantProfile, CreditHistory, Decision};
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config").unwrap();
/// let profile = ApplicantProfile::new(
///     Decimal::from(60_000),
///     Decimal::from(100_000),
///     CreditHistory::Good,
/// );
///
/// let result = score(&profile, config.policy("threshold").unwrap()).unwrap();
/// assert_eq!(result.score, 100);
/// assert_eq!(result.decision, Decision::Approved);
/// ```
pub fn score(profile: &ApplicantProfile, policy: &PolicyTable) -> EngineResult<ScoreResult> {
    let mut contributions = Vec::with_capacity(policy.factors.len());
    let mut warnings = Vec::new();

    for factor in &policy.factors {
        match evaluate_factor(factor, profile) {
            Some(contribution) => contributions.push(contribution),
            None => match policy.on_coverage_gap {
                CoverageGapMode::Fail => {
                    return Err(EngineError::PolicyCoverageGap {
                        policy: policy.name.clone(),
                        factor: factor.id.clone(),
                    });
                }
                CoverageGapMode::Warn => {
                    warn!(
                        policy = %policy.name,
                        factor = %factor.id,
                        "No branch matched; factor contributes zero"
                    );
                    warnings.push(AuditWarning {
                        code: COVERAGE_GAP_WARNING.to_string(),
                        message: format!(
                            "Factor '{}' of policy '{}' has no branch covering this applicant",
                            factor.id, policy.name
                        ),
                        severity: "high".to_string(),
                    });
                    contributions.push(FactorContribution {
                        factor_id: factor.id.clone(),
                        factor_name: factor.name.clone(),
                        branch_index: None,
                        points: 0,
                        reasoning: format!("{}: no branch matched => 0 points", factor.name),
                    });
                }
            },
        }
    }

    let total = contributions
        .iter()
        .try_fold(0i64, |acc, c| acc.checked_add(c.points))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("score for policy '{}' overflowed", policy.name),
        })?;
    let (category, label) = classify(total, policy);

    debug!(
        policy = %policy.name,
        score = total,
        category = ?category,
        "Scored applicant"
    );

    Ok(ScoreResult {
        policy: policy.name.clone(),
        policy_version: policy.version.clone(),
        score: total,
        category,
        decision: category.decision(),
        label: label.to_string(),
        contributions,
        warnings,
    })
}
