//! Loan terms and amortization result models.
//!
//! This module contains the inputs and outputs of the EMI calculator. All
//! amounts are held at full precision; [`AmortizationResult::rounded`] is the
//! presentation boundary where values are rounded for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_money;

/// The terms of a loan to amortize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// The amount borrowed.
    pub principal: Decimal,
    /// Nominal annual interest rate in percent (e.g. `10` for 10%).
    pub annual_rate_percent: Decimal,
    /// Tenure in years, fractions permitted.
    pub tenure_years: Decimal,
}

impl LoanTerms {
    /// Creates new loan terms.
    pub fn new(principal: Decimal, annual_rate_percent: Decimal, tenure_years: Decimal) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_years,
        }
    }
}

/// How the installment was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationMethod {
    /// Standard reducing-balance formula.
    ReducingBalance,
    /// `principal / months`, used when the monthly rate is effectively zero.
    Linear,
}

/// The installment and totals for a loan, at full precision.
///
/// `total_payable == installment * months` and
/// `total_interest == total_payable - principal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// The principal that was amortized.
    pub principal: Decimal,
    /// Number of monthly installments.
    pub months: u32,
    /// Periodic (monthly) interest rate as a fraction.
    pub monthly_rate: Decimal,
    /// The equated monthly installment.
    pub installment: Decimal,
    /// Total of all installments.
    pub total_payable: Decimal,
    /// Interest paid over the tenure.
    pub total_interest: Decimal,
    /// The formula used.
    pub method: AmortizationMethod,
}

impl AmortizationResult {
    /// Rounds the monetary amounts to `decimal_places` for display.
    ///
    /// Each amount is rounded from its full-precision value, so the rounded
    /// total is never derived from a rounded installment.
    ///
    /// # Example
    ///
    /// ```
    /// use loan_risk_engine::calculation::compute_emi;
    /// use loan_risk_engine::config::AmortizationPolicy;
    /// use loan_risk_engine::models::LoanTerms;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let terms = LoanTerms::new(Decimal::from(100_000), Decimal::from(10), Decimal::ONE);
    /// let result = compute_emi(&terms, &AmortizationPolicy::default()).unwrap();
    /// let summary = result.rounded(2);
    /// assert_eq!(summary.installment, Decimal::from_str("8791.59").unwrap());
    /// ```
    pub fn rounded(&self, decimal_places: u32) -> AmortizationSummary {
        AmortizationSummary {
            principal: round_money(self.principal, decimal_places),
            months: self.months,
            installment: round_money(self.installment, decimal_places),
            total_payable: round_money(self.total_payable, decimal_places),
            total_interest: round_money(self.total_interest, decimal_places),
            method: self.method,
        }
    }
}

/// Display-ready amortization figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    /// The principal that was amortized.
    pub principal: Decimal,
    /// Number of monthly installments.
    pub months: u32,
    /// Monthly installment.
    pub installment: Decimal,
    /// Total of all installments.
    pub total_payable: Decimal,
    /// Interest paid over the tenure.
    pub total_interest: Decimal,
    /// The formula used.
    pub method: AmortizationMethod,
}

/// One month of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// One-based installment number.
    pub month: u32,
    /// Balance owed before this installment.
    pub opening_balance: Decimal,
    /// Amount paid this month.
    pub installment: Decimal,
    /// Interest portion of the installment.
    pub interest: Decimal,
    /// Principal portion of the installment.
    pub principal: Decimal,
    /// Balance owed after this installment.
    pub closing_balance: Decimal,
}

impl ScheduleEntry {
    /// Rounds every amount to `decimal_places` for display.
    pub fn rounded(&self, decimal_places: u32) -> ScheduleEntry {
        ScheduleEntry {
            month: self.month,
            opening_balance: round_money(self.opening_balance, decimal_places),
            installment: round_money(self.installment, decimal_places),
            interest: round_money(self.interest, decimal_places),
            principal: round_money(self.principal, decimal_places),
            closing_balance: round_money(self.closing_balance, decimal_places),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounded_rounds_each_amount_independently() {
        let result = AmortizationResult {
            principal: dec("1000"),
            months: 3,
            monthly_rate: dec("0.01"),
            installment: dec("340.022115"),
            total_payable: dec("1020.066345"),
            total_interest: dec("20.066345"),
            method: AmortizationMethod::ReducingBalance,
        };

        let summary = result.rounded(2);
        assert_eq!(summary.installment, dec("340.02"));
        assert_eq!(summary.total_payable, dec("1020.07"));
        assert_eq!(summary.total_interest, dec("20.07"));
        assert_eq!(summary.months, 3);
    }

    #[test]
    fn test_loan_terms_deserialize_from_numbers() {
        let json = r#"{"principal": 250000, "annual_rate_percent": 8.5, "tenure_years": 2.5}"#;
        let terms: LoanTerms = serde_json::from_str(json).unwrap();
        assert_eq!(terms.annual_rate_percent, dec("8.5"));
        assert_eq!(terms.tenure_years, dec("2.5"));
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&AmortizationMethod::ReducingBalance).unwrap();
        assert_eq!(json, "\"reducing_balance\"");
    }
}
