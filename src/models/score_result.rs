//! Scoring result models for the Loan Risk Engine.
//!
//! This module contains the [`ScoreResult`] type and the structures that
//! explain how a score was reached: one [`FactorContribution`] per policy
//! factor plus any [`AuditWarning`]s raised during evaluation.

use serde::{Deserialize, Serialize};

/// Coarse risk bucket derived from the total score.
///
/// # Example
///
/// ```
/// use loan_risk_engine::models::{Decision, RiskCategory};
///
/// assert_eq!(RiskCategory::Low.decision(), Decision::Approved);
/// assert_eq!(RiskCategory::High.decision(), Decision::Rejected);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl RiskCategory {
    /// Returns the decision paired with this category.
    pub fn decision(self) -> Decision {
        match self {
            RiskCategory::Low => Decision::Approved,
            RiskCategory::Medium => Decision::Conditional,
            RiskCategory::High => Decision::Rejected,
        }
    }
}

/// The lending decision for an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the application.
    Approved,
    /// Approve subject to conditions.
    Conditional,
    /// Reject the application.
    Rejected,
}

/// Records which branch of a factor fired and what it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorContribution {
    /// The factor identifier from the policy table.
    pub factor_id: String,
    /// Human-readable factor name.
    pub factor_name: String,
    /// Zero-based index of the matching branch, `None` on a coverage gap.
    pub branch_index: Option<usize>,
    /// Points contributed to the total.
    pub points: i64,
    /// Human-readable explanation of the match.
    pub reasoning: String,
}

/// A warning generated during evaluation.
///
/// Warnings indicate issues that don't prevent a result but that a policy
/// author should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The outcome of scoring one applicant under one policy.
///
/// Contains no timestamps or identifiers, so scoring the same profile under
/// the same policy always produces an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// The policy that produced this result.
    pub policy: String,
    /// The version of that policy.
    pub policy_version: String,
    /// Sum of all factor contributions. Not clamped.
    pub score: i64,
    /// Risk bucket for the score.
    pub category: RiskCategory,
    /// Lending decision; always `category.decision()`.
    pub decision: Decision,
    /// The policy's display label for the matching band.
    pub label: String,
    /// One entry per factor, in policy order.
    pub contributions: Vec<FactorContribution>,
    /// Warnings raised while evaluating.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}
