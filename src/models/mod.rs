//! Core data models for the Loan Risk Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod applicant;
mod loan;
mod score_result;

pub use applicant::{ApplicantProfile, CreditHistory, Education, MaritalStatus};
pub use loan::{AmortizationMethod, AmortizationResult, AmortizationSummary, LoanTerms, ScheduleEntry};
pub use score_result::{AuditWarning, Decision, FactorContribution, RiskCategory, ScoreResult};
