//! Configuration loading and management for the Loan Risk Engine.
//!
//! This module provides functionality to load scoring policies and
//! amortization settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use loan_risk_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! for policy in config.policies() {
//!     println!("{} v{}", policy.name, policy.version);
//! }
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AmortizationPolicy, BandOutcome, Branch, Comparison, CoverageGapMode, CutoffBand, Factor,
    MonthRounding, NumericField, PolicyTable, Predicate,
};
