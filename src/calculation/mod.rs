//! Calculation logic for the Loan Risk Engine.
//!
//! This module contains the policy-driven scoring algorithm, the EMI
//! calculator with its repayment schedule, and the validation and rounding
//! helpers they share.

mod amortization;
mod scoring;
mod validation;

pub use amortization::{amortization_schedule, compute_emi, installment_count};
pub use scoring::{COVERAGE_GAP_WARNING, classify, score};
pub use validation::{require_non_negative, require_positive, round_money};
