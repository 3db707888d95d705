//! Loan Risk Scoring & EMI Engine
//!
//! This crate scores consumer loan applicants against named, versioned policy
//! tables and computes equated monthly installments (EMI) for loans using the
//! reducing-balance amortization formula.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod telemetry;

pub use engine::LoanEngine;
