//! Configuration types for loan scoring and amortization.
//!
//! This module contains the strongly-typed policy tables and amortization
//! settings that are deserialized from YAML configuration files.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{CreditHistory, Education, MaritalStatus, RiskCategory};

/// A numeric applicant attribute that predicates can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    /// Applicant's monthly income.
    MonthlyIncome,
    /// Co-applicant's monthly income.
    CoapplicantIncome,
    /// Monthly income plus co-applicant income.
    HouseholdIncome,
    /// Requested loan amount.
    LoanAmount,
}

impl NumericField {
    /// Returns the snake_case field name.
    pub fn as_str(self) -> &'static str {
        match self {
            NumericField::MonthlyIncome => "monthly_income",
            NumericField::CoapplicantIncome => "coapplicant_income",
            NumericField::HouseholdIncome => "household_income",
            NumericField::LoanAmount => "loan_amount",
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal.
    Eq,
}

impl Comparison {
    /// Applies the operator as `left <op> right`.
    pub fn apply(self, left: Decimal, right: Decimal) -> bool {
        match self {
            Comparison::Gt => left > right,
            Comparison::Gte => left >= right,
            Comparison::Lt => left < right,
            Comparison::Lte => left <= right,
            Comparison::Eq => left == right,
        }
    }

    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Eq => "==",
        }
    }
}

/// A condition over an applicant profile.
///
/// In YAML the variant is selected by the `kind` key:
///
/// ```yaml
/// when: { kind: compare, field: monthly_income, op: gt, value: 50000 }
/// when: { kind: ratio, field: loan_amount, op: lt, of: monthly_income, multiplier: 5 }
/// when: { kind: credit_history, is: good }
/// when: { kind: always }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Always matches. Used as the final catch-all branch of a factor.
    Always,
    /// Compares a numeric field with a constant.
    Compare {
        /// The field to read.
        field: NumericField,
        /// The operator.
        op: Comparison,
        /// The constant on the right-hand side.
        value: Decimal,
    },
    /// Compares a numeric field with a multiple of another field.
    Ratio {
        /// The field on the left-hand side.
        field: NumericField,
        /// The operator.
        op: Comparison,
        /// The field on the right-hand side.
        of: NumericField,
        /// Multiplier applied to `of`.
        multiplier: Decimal,
    },
    /// Matches a credit history value.
    CreditHistory {
        /// The value to match.
        is: CreditHistory,
    },
    /// Matches an education level. Never matches an absent education.
    Education {
        /// The value to match.
        is: Education,
    },
    /// Matches a marital status. Never matches an absent status.
    MaritalStatus {
        /// The value to match.
        is: MaritalStatus,
    },
}

/// One ordered alternative within a factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// The condition under which this branch fires.
    pub when: Predicate,
    /// Points awarded when it fires.
    pub points: i64,
}

/// A scoring factor: an ordered list of mutually exclusive branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    /// Unique identifier within the policy (e.g. "income").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Branches in evaluation order; the first match wins.
    pub branches: Vec<Branch>,
}

impl Factor {
    /// Returns the smallest and largest points any branch can award.
    ///
    /// A factor without a trailing `always` branch can also contribute zero.
    pub fn points_range(&self) -> (i64, i64) {
        let mut min = self.branches.iter().map(|b| b.points).min().unwrap_or(0);
        let mut max = self.branches.iter().map(|b| b.points).max().unwrap_or(0);
        if !self.is_exhaustive() {
            min = min.min(0);
            max = max.max(0);
        }
        (min, max)
    }

    /// Returns true if the last branch is an unconditional catch-all.
    pub fn is_exhaustive(&self) -> bool {
        matches!(self.branches.last(), Some(Branch { when: Predicate::Always, .. }))
    }
}

/// A score band: scores at or above `min_score` fall in this band unless a
/// higher band claims them first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffBand {
    /// Inclusive lower bound of the band.
    pub min_score: i64,
    /// Risk category for scores in this band.
    pub category: RiskCategory,
    /// Display label for this band (e.g. "High chance").
    pub label: String,
}

/// The category and label used when the score is below every band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandOutcome {
    /// Risk category.
    pub category: RiskCategory,
    /// Display label.
    pub label: String,
}

/// What the engine does when no branch of a factor matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageGapMode {
    /// Fail the evaluation with [`EngineError::PolicyCoverageGap`].
    #[default]
    Fail,
    /// Contribute zero points and attach a warning to the result.
    Warn,
}

/// A named, versioned scoring policy.
///
/// # Example
///
/// ```
/// use loan_risk_engine::config::PolicyTable;
///
/// let yaml = r#"
/// name: tiny
/// version: "1"
/// factors:
///   - id: credit
///     name: Credit history
///     branches:
///       - when: { kind: credit_history, is: good }
///         points: 80
///       - when: { kind: always }
///         points: 0
/// cutoffs:
///   - { min_score: 70, category: low, label: Approved }
/// otherwise: { category: high, label: Rejected }
/// "#;
///
/// let policy: PolicyTable = serde_yaml::from_str(yaml).unwrap();
/// assert!(policy.validate().is_ok());
/// assert_eq!(policy.score_range(), Some((0, 80)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTable {
    /// Policy name used to select it (e.g. "threshold").
    pub name: String,
    /// Policy version.
    pub version: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Behaviour on a factor coverage gap.
    #[serde(default)]
    pub on_coverage_gap: CoverageGapMode,
    /// Factors in evaluation order.
    pub factors: Vec<Factor>,
    /// Cutoff bands, highest `min_score` first.
    pub cutoffs: Vec<CutoffBand>,
    /// Outcome below the lowest band.
    pub otherwise: BandOutcome,
}

impl PolicyTable {
    /// Checks the structural rules every policy table must satisfy.
    ///
    /// The name must be non-empty, there must be at least one factor, factor
    /// ids must be unique and every factor needs a branch. Factor points must
    /// sum without overflow, and cutoff bands must be strictly descending by
    /// `min_score`.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidPolicy {
            policy: self.name.clone(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("policy name must not be empty".to_string()));
        }
        if self.factors.is_empty() {
            return Err(invalid("policy must define at least one factor".to_string()));
        }

        let mut seen = HashSet::new();
        for factor in &self.factors {
            if !seen.insert(factor.id.as_str()) {
                return Err(invalid(format!("duplicate factor id '{}'", factor.id)));
            }
            if factor.branches.is_empty() {
                return Err(invalid(format!("factor '{}' has no branches", factor.id)));
            }
        }

        if self.score_range().is_none() {
            return Err(invalid(
                "factor points can sum beyond the representable score range".to_string(),
            ));
        }

        for pair in self.cutoffs.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(invalid(format!(
                    "cutoff bands must be strictly descending, found {} before {}",
                    pair[0].min_score, pair[1].min_score
                )));
            }
        }

        Ok(())
    }

    /// Returns the lowest and highest total score the policy can produce,
    /// or `None` if summing factor points in order would overflow `i64`.
    pub fn score_range(&self) -> Option<(i64, i64)> {
        self.factors
            .iter()
            .map(Factor::points_range)
            .try_fold((0i64, 0i64), |(lo, hi), (min, max)| {
                Some((lo.checked_add(min)?, hi.checked_add(max)?))
            })
    }

    /// Returns the ids of factors without a trailing `always` branch.
    pub fn non_exhaustive_factors(&self) -> Vec<&str> {
        self.factors
            .iter()
            .filter(|f| !f.is_exhaustive())
            .map(|f| f.id.as_str())
            .collect()
    }
}

/// How a fractional number of months is turned into whole installments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthRounding {
    /// Round to the nearest month, halves away from zero.
    #[default]
    Nearest,
    /// Drop the partial month.
    Down,
    /// Count the partial month as a full installment.
    Up,
}

/// Settings for the EMI calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationPolicy {
    /// Rounding applied to `tenure_years * 12`.
    pub month_rounding: MonthRounding,
    /// Monthly rates below this use the linear fallback.
    pub near_zero_monthly_rate: Decimal,
    /// Accept a rate of exactly zero and amortize it linearly.
    pub allow_zero_rate: bool,
    /// Decimal places used when presenting amounts.
    pub display_decimal_places: u32,
    /// Longest accepted loan, in monthly installments.
    pub max_months: u32,
}

impl AmortizationPolicy {
    /// Rejects settings under which no loan could be amortized.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_months == 0 {
            return Err(EngineError::InvalidPolicy {
                policy: "amortization".to_string(),
                message: "max_months must be at least 1".to_string(),
            });
        }
        if self.near_zero_monthly_rate.is_sign_negative() {
            return Err(EngineError::InvalidPolicy {
                policy: "amortization".to_string(),
                message: "near_zero_monthly_rate must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AmortizationPolicy {
    fn default() -> Self {
        Self {
            month_rounding: MonthRounding::Nearest,
            // 1e-10
            near_zero_monthly_rate: Decimal::new(1, 10),
            allow_zero_rate: false,
            display_decimal_places: 2,
            max_months: 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(id: &str, branches: Vec<Branch>) -> Factor {
        Factor {
            id: id.to_string(),
            name: id.to_string(),
            branches,
        }
    }

    fn credit_factor() -> Factor {
        factor(
            "credit",
            vec![
                Branch {
                    when: Predicate::CreditHistory {
                        is: CreditHistory::Good,
                    },
                    points: 40,
                },
                Branch {
                    when: Predicate::Always,
                    points: 5,
                },
            ],
        )
    }

    fn policy(factors: Vec<Factor>, cutoffs: Vec<i64>) -> PolicyTable {
        PolicyTable {
            name: "test".to_string(),
            version: "1".to_string(),
            description: String::new(),
            on_coverage_gap: CoverageGapMode::Fail,
            factors,
            cutoffs: cutoffs
                .into_iter()
                .map(|min_score| CutoffBand {
                    min_score,
                    category: RiskCategory::Low,
                    label: "band".to_string(),
                })
                .collect(),
            otherwise: BandOutcome {
                category: RiskCategory::High,
                label: "Rejected".to_string(),
            },
        }
    }

    #[test]
    fn test_comparison_apply() {
        let one = Decimal::ONE;
        let two = Decimal::TWO;
        assert!(Comparison::Gt.apply(two, one));
        assert!(!Comparison::Gt.apply(one, one));
        assert!(Comparison::Gte.apply(one, one));
        assert!(Comparison::Lt.apply(one, two));
        assert!(Comparison::Lte.apply(two, two));
        assert!(Comparison::Eq.apply(two, two));
    }

    #[test]
    fn test_predicate_yaml_forms() {
        let compare: Predicate =
            serde_yaml::from_str("{ kind: compare, field: monthly_income, op: gt, value: 50000 }")
                .unwrap();
        assert_eq!(
            compare,
            Predicate::Compare {
                field: NumericField::MonthlyIncome,
                op: Comparison::Gt,
                value: Decimal::from(50_000),
            }
        );

        let always: Predicate = serde_yaml::from_str("{ kind: always }").unwrap();
        assert_eq!(always, Predicate::Always);

        let credit: Predicate = serde_yaml::from_str("{ kind: credit_history, is: good }").unwrap();
        assert_eq!(
            credit,
            Predicate::CreditHistory {
                is: CreditHistory::Good
            }
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_policy() {
        let table = policy(vec![credit_factor()], vec![70, 40]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_factor_ids() {
        let table = policy(vec![credit_factor(), credit_factor()], vec![70]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate factor id 'credit'"));
    }

    #[test]
    fn test_validate_rejects_unordered_cutoffs() {
        let table = policy(vec![credit_factor()], vec![40, 70]);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidPolicy { .. }));
    }

    #[test]
    fn test_validate_rejects_factor_without_branches() {
        let table = policy(vec![factor("empty", vec![])], vec![70]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_factors() {
        let table = policy(vec![], vec![70]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_score_range_counts_non_exhaustive_factor_as_zero_floor() {
        let partial = factor(
            "married",
            vec![Branch {
                when: Predicate::MaritalStatus {
                    is: MaritalStatus::Married,
                },
                points: 10,
            }],
        );
        let table = policy(vec![credit_factor(), partial], vec![70]);
        assert_eq!(table.score_range(), Some((5, 50)));
        assert_eq!(table.non_exhaustive_factors(), vec!["married"]);
    }

    #[test]
    fn test_validate_rejects_points_that_overflow_the_score() {
        let huge = |id: &str| {
            factor(
                id,
                vec![Branch {
                    when: Predicate::Always,
                    points: i64::MAX,
                }],
            )
        };
        let table = policy(vec![huge("first"), huge("second")], vec![70]);

        assert_eq!(table.score_range(), None);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidPolicy { .. }));
    }

    #[test]
    fn test_score_range_allows_extreme_points_that_fit() {
        let single = factor(
            "single",
            vec![Branch {
                when: Predicate::Always,
                points: i64::MIN,
            }],
        );
        let table = policy(vec![single], vec![0]);
        assert_eq!(table.score_range(), Some((i64::MIN, i64::MIN)));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_amortization_policy_defaults_when_fields_missing() {
        let policy: AmortizationPolicy = serde_yaml::from_str("allow_zero_rate: true").unwrap();
        assert!(policy.allow_zero_rate);
        assert_eq!(policy.month_rounding, MonthRounding::Nearest);
        assert_eq!(policy.display_decimal_places, 2);
        assert_eq!(policy.near_zero_monthly_rate, Decimal::new(1, 10));
        assert_eq!(policy.max_months, 1200);
    }
}
