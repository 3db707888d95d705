//! Equated monthly installment (EMI) calculation.
//!
//! This module computes the fixed monthly installment that amortizes a loan
//! under the reducing-balance method:
//!
//! ```text
//! r = annual_rate_percent / 1200
//! n = tenure_years * 12   (rounded to whole months)
//! installment = principal * r * (1 + r)^n / ((1 + r)^n - 1)
//! ```
//!
//! When `r` is effectively zero the formula degenerates and the installment
//! falls back to `principal / n`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use crate::config::{AmortizationPolicy, MonthRounding};
use crate::error::{EngineError, EngineResult};
use crate::models::{AmortizationMethod, AmortizationResult, LoanTerms, ScheduleEntry};

use super::validation::require_positive;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT_PER_YEAR_TO_MONTHLY: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed the decimal range", what),
    }
}

/// Converts a tenure in years to a whole number of monthly installments.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateAmortizationInput`] if the tenure is not
/// positive or rounds to zero months, and [`EngineError::InvalidInput`] if it
/// exceeds `policy.max_months`.
///
/// # Example
///
/// ```
/// use loan_risk_engine::calculation::installment_count;
/// use loan_risk_engine::config::{AmortizationPolicy, MonthRounding};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tenure = Decimal::from_str("2.51").unwrap(); // 30.12 months
/// let mut policy = AmortizationPolicy::default();
/// assert_eq!(installment_count(tenure, &policy).unwrap(), 30);
///
/// policy.month_rounding = MonthRounding::Up;
/// assert_eq!(installment_count(tenure, &policy).unwrap(), 31);
/// ```
pub fn installment_count(tenure_years: Decimal, policy: &AmortizationPolicy) -> EngineResult<u32> {
    if tenure_years <= Decimal::ZERO {
        return Err(EngineError::degenerate(
            "tenure_years",
            format!("must be greater than zero, got {}", tenure_years),
        ));
    }

    let strategy = match policy.month_rounding {
        MonthRounding::Nearest => RoundingStrategy::MidpointAwayFromZero,
        MonthRounding::Down => RoundingStrategy::ToZero,
        MonthRounding::Up => RoundingStrategy::AwayFromZero,
    };

    let months = tenure_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| overflow("tenure in months"))?
        .round_dp_with_strategy(0, strategy);

    if months.is_zero() {
        return Err(EngineError::degenerate(
            "tenure_years",
            format!("{} years rounds to zero monthly installments", tenure_years),
        ));
    }

    if months > Decimal::from(policy.max_months) {
        return Err(EngineError::invalid_input(
            "tenure_years",
            format!(
                "{} years is {} months, above the limit of {} months",
                tenure_years, months, policy.max_months
            ),
        ));
    }

    months.to_u32().ok_or_else(|| {
        EngineError::invalid_input(
            "tenure_years",
            format!("{} years is too long to amortize", tenure_years),
        )
    })
}

/// Computes the monthly installment and totals for a loan.
///
/// All amounts are returned at full precision; round them with
/// [`AmortizationResult::rounded`] for display.
///
/// # Errors
///
/// - [`EngineError::DegenerateAmortizationInput`] for a rate or tenure that is
///   not positive. A rate of exactly zero is accepted only when
///   `allow_zero_rate` is set.
/// - [`EngineError::InvalidInput`] for a principal that is not positive.
/// - [`EngineError::CalculationError`] if an intermediate value overflows.
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
///
/// assert_eq!(result.months, 12);
/// let summary = result.rounded(2);
/// assert_eq!(summary.installment, Decimal::from_str("8791.59").unwrap());
/// assert_eq!(summary.total_interest, Decimal::from_str("5499.06").unwrap());
/// ```
pub fn compute_emi(terms: &LoanTerms, policy: &AmortizationPolicy) -> EngineResult<AmortizationResult> {
    let rate = terms.annual_rate_percent;
    if rate < Decimal::ZERO || (rate.is_zero() && !policy.allow_zero_rate) {
        return Err(EngineError::degenerate(
            "annual_rate_percent",
            format!("must be greater than zero, got {}", rate),
        ));
    }
    let months = installment_count(terms.tenure_years, policy)?;
    require_positive("principal", terms.principal)?;

    let principal = terms.principal;
    let n = Decimal::from(months);
    let monthly_rate = rate / PERCENT_PER_YEAR_TO_MONTHLY;

    let (installment, method) = if monthly_rate < policy.near_zero_monthly_rate {
        (principal / n, AmortizationMethod::Linear)
    } else {
        reducing_balance_installment(principal, monthly_rate, months)?
    };

    let total_payable = match method {
        // principal / n * n may not reproduce principal exactly
        AmortizationMethod::Linear => principal,
        AmortizationMethod::ReducingBalance => installment
            .checked_mul(n)
            .ok_or_else(|| overflow("total payable"))?,
    };

    Ok(AmortizationResult {
        principal,
        months,
        monthly_rate,
        installment,
        total_payable,
        total_interest: total_payable - principal,
        method,
    })
}

fn reducing_balance_installment(
    principal: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> EngineResult<(Decimal, AmortizationMethod)> {
    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(months))
        .ok_or_else(|| overflow("compound growth factor"))?;
    let denominator = growth - Decimal::ONE;

    // (1 + r)^n can round to exactly 1 for tiny r
    if denominator.is_zero() {
        return Ok((principal / Decimal::from(months), AmortizationMethod::Linear));
    }

    let installment = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| overflow("installment"))?;

    Ok((installment, AmortizationMethod::ReducingBalance))
}

/// Builds the month-by-month repayment schedule for a loan.
///
/// Each installment is split into interest on the opening balance and
/// principal repaid. The last installment absorbs any residual so the final
/// closing balance is exactly zero.
pub fn amortization_schedule(
    terms: &LoanTerms,
    policy: &AmortizationPolicy,
) -> EngineResult<Vec<ScheduleEntry>> {
    let result = compute_emi(terms, policy)?;
    let rate = match result.method {
        AmortizationMethod::ReducingBalance => result.monthly_rate,
        AmortizationMethod::Linear => Decimal::ZERO,
    };

    let mut entries = Vec::new();
    let mut balance = result.principal;

    for month in 1..=result.months {
        let interest = balance * rate;
        let (installment, principal) = if month == result.months {
            (balance + interest, balance)
        } else {
            (result.installment, result.installment - interest)
        };
        let closing_balance = balance - principal;

        entries.push(ScheduleEntry {
            month,
            opening_balance: balance,
            installment,
            interest,
            principal,
            closing_balance,
        });
        balance = closing_balance;
    }

    Ok(entries)
}
