//! Applicant profile model and related types.
//!
//! This module defines the [`ApplicantProfile`] scored by the policy engine
//! along with the categorical attributes it carries.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::calculation::require_non_negative;
use crate::error::{EngineError, EngineResult};

/// An applicant's repayment track record.
///
/// Accepts several wire representations: `true`/`false`, `1`/`0`
/// (integer or float, as found in loan datasets) and `"good"`/`"bad"`.
/// Anything else is rejected.
///
/// # Example
///
/// ```
/// use loan_risk_engine::models::CreditHistory;
///
/// let good: CreditHistory = serde_json::from_str("1").unwrap();
/// assert_eq!(good, CreditHistory::Good);
/// assert!(serde_json::from_str::<CreditHistory>("2").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditHistory {
    /// The applicant has met past obligations.
    Good,
    /// The applicant has defaulted or has no usable history.
    Bad,
}

impl From<bool> for CreditHistory {
    fn from(good: bool) -> Self {
        if good {
            CreditHistory::Good
        } else {
            CreditHistory::Bad
        }
    }
}

impl TryFrom<i64> for CreditHistory {
    type Error = EngineError;

    fn try_from(value: i64) -> EngineResult<Self> {
        match value {
            1 => Ok(CreditHistory::Good),
            0 => Ok(CreditHistory::Bad),
            other => Err(EngineError::invalid_input(
                "credit_history",
                format!("expected 1 (good) or 0 (bad), got {}", other),
            )),
        }
    }
}

impl TryFrom<f64> for CreditHistory {
    type Error = EngineError;

    fn try_from(value: f64) -> EngineResult<Self> {
        if value == 1.0 {
            Ok(CreditHistory::Good)
        } else if value == 0.0 {
            Ok(CreditHistory::Bad)
        } else {
            Err(EngineError::invalid_input(
                "credit_history",
                format!("expected 1 (good) or 0 (bad), got {}", value),
            ))
        }
    }
}

impl FromStr for CreditHistory {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" | "1" | "true" => Ok(CreditHistory::Good),
            "bad" | "0" | "false" => Ok(CreditHistory::Bad),
            _ => Err(EngineError::invalid_input(
                "credit_history",
                format!("'{}' is not one of good, bad, 1, 0", s),
            )),
        }
    }
}

struct CreditHistoryVisitor;

impl Visitor<'_> for CreditHistoryVisitor {
    type Value = CreditHistory;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, 1/0, or \"good\"/\"bad\"")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CreditHistory, E> {
        Ok(v.into())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CreditHistory, E> {
        CreditHistory::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CreditHistory, E> {
        let v = i64::try_from(v).map_err(E::custom)?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CreditHistory, E> {
        CreditHistory::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CreditHistory, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for CreditHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CreditHistoryVisitor)
    }
}

/// The applicant's highest education level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    /// Holds a degree.
    Graduate,
    /// Does not hold a degree.
    NotGraduate,
}

/// The applicant's marital status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Married applicant.
    Married,
    /// Unmarried applicant.
    Single,
}

/// The attributes of a single loan applicant.
///
/// Co-applicant income defaults to zero when absent. Education and marital
/// status stay `None` when absent; an absent attribute never satisfies a
/// policy predicate that tests it.
///
/// # Example
///
/// ```
/// use loan_risk_engine::models::{ApplicantProfile, CreditHistory};
/// use rust_decimal::Decimal;
///
/// let profile = ApplicantProfile::new(
///     Decimal::from(60_000),
///     Decimal::from(200_000),
///     CreditHistory::Good,
/// );
/// assert!(profile.validate().is_ok());
/// assert_eq!(profile.coapplicant_income, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// Applicant's monthly income.
    pub monthly_income: Decimal,
    /// Co-applicant's monthly income.
    #[serde(default)]
    pub coapplicant_income: Decimal,
    /// The requested loan amount.
    pub loan_amount: Decimal,
    /// The applicant's credit history.
    pub credit_history: CreditHistory,
    /// Education level, if known.
    #[serde(default)]
    pub education: Option<Education>,
    /// Marital status, if known.
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
}

impl ApplicantProfile {
    /// Creates a profile with the mandatory attributes and no co-applicant.
    pub fn new(monthly_income: Decimal, loan_amount: Decimal, credit_history: CreditHistory) -> Self {
        Self {
            monthly_income,
            coapplicant_income: Decimal::ZERO,
            loan_amount,
            credit_history,
            education: None,
            marital_status: None,
        }
    }

    /// Sets the co-applicant income.
    pub fn with_coapplicant_income(mut self, income: Decimal) -> Self {
        self.coapplicant_income = income;
        self
    }

    /// Sets the education level.
    pub fn with_education(mut self, education: Education) -> Self {
        self.education = Some(education);
        self
    }

    /// Sets the marital status.
    pub fn with_marital_status(mut self, status: MaritalStatus) -> Self {
        self.marital_status = Some(status);
        self
    }

    /// Checks that every monetary field is non-negative.
    ///
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        require_non_negative("monthly_income", self.monthly_income)?;
        require_non_negative("coapplicant_income", self.coapplicant_income)?;
        require_non_negative("loan_amount", self.loan_amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_minimal_profile_defaults() {
        let json = r#"{
            "monthly_income": "45000",
            "loan_amount": "100000",
            "credit_history": 1
        }"#;

        let profile: ApplicantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.monthly_income, dec("45000"));
        assert_eq!(profile.coapplicant_income, Decimal::ZERO);
        assert_eq!(profile.credit_history, CreditHistory::Good);
        assert!(profile.education.is_none());
        assert!(profile.marital_status.is_none());
    }

    #[test]
    fn test_deserialize_full_profile() {
        let json = r#"{
            "monthly_income": 5849,
            "coapplicant_income": 1508.5,
            "loan_amount": 128,
            "credit_history": "bad",
            "education": "not_graduate",
            "marital_status": "married"
        }"#;

        let profile: ApplicantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.coapplicant_income, dec("1508.5"));
        assert_eq!(profile.credit_history, CreditHistory::Bad);
        assert_eq!(profile.education, Some(Education::NotGraduate));
        assert_eq!(profile.marital_status, Some(MaritalStatus::Married));
    }

    #[test]
    fn test_credit_history_accepts_all_representations() {
        for raw in ["true", "1", "1.0", "\"good\"", "\"GOOD\"", "\"1\""] {
            let parsed: CreditHistory = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, CreditHistory::Good, "input {}", raw);
        }
        for raw in ["false", "0", "0.0", "\"bad\"", "\"0\""] {
            let parsed: CreditHistory = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, CreditHistory::Bad, "input {}", raw);
        }
    }

    #[test]
    fn test_credit_history_rejects_other_values() {
        for raw in ["2", "-1", "0.5", "\"excellent\"", "null"] {
            assert!(
                serde_json::from_str::<CreditHistory>(raw).is_err(),
                "input {} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_credit_history_try_from_integer() {
        assert_eq!(CreditHistory::try_from(1i64).unwrap(), CreditHistory::Good);
        assert_eq!(CreditHistory::try_from(0i64).unwrap(), CreditHistory::Bad);
        let err = CreditHistory::try_from(3i64).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "credit_history"));
    }

    #[test]
    fn test_validate_rejects_negative_income() {
        let profile = ApplicantProfile::new(dec("-1"), dec("1000"), CreditHistory::Good);
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "monthly_income"));
    }

    #[test]
    fn test_validate_rejects_negative_loan_amount() {
        let profile = ApplicantProfile::new(dec("1000"), dec("-0.01"), CreditHistory::Good);
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "loan_amount"));
    }

    #[test]
    fn test_validate_rejects_negative_coapplicant_income() {
        let profile = ApplicantProfile::new(dec("1000"), dec("1000"), CreditHistory::Good)
            .with_coapplicant_income(dec("-5"));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_zero_amounts_are_valid() {
        let profile = ApplicantProfile::new(Decimal::ZERO, Decimal::ZERO, CreditHistory::Bad);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_non_numeric_income_fails_to_deserialize() {
        let json = r#"{
            "monthly_income": "lots",
            "loan_amount": "100",
            "credit_history": 1
        }"#;
        assert!(serde_json::from_str::<ApplicantProfile>(json).is_err());
    }
}
