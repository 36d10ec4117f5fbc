#![warn(missing_docs)]
//! Splitstat Core - Test Procedures
//!
//! The inference engine of splitstat: four hypothesis-testing procedures
//! (permutation, Mann-Whitney U, bootstrap, t-test with power analysis)
//! sharing one result contract and one decision policy.
//!
//! Every procedure consumes two per-user-aggregated samples (control,
//! treatment) and emits an immutable [`TestResult`] carrying the p-value,
//! the ACCEPT / REJECT / KEEP_RUNNING decision, the effect direction, the
//! confidence interval, and a human-readable justification.
//!
//! Procedures are pure computations: no I/O, no shared state, and an owned
//! random generator seeded from the [`AnalysisConfig`], so the same inputs
//! and seed reproduce a result bit for bit.

mod config;
mod decision;
mod metric;
pub mod procedure;
mod result;

pub use config::AnalysisConfig;
pub use decision::{mean_difference_decision, stochastic_superiority_decision};
pub use metric::{Metric, UnknownMetric};
pub use procedure::{TestError, TestKind, UnknownTest};
pub use result::{Arm, ArmSamples, Decision, Direction, TestResult, VisInfo};

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.12;

/// Default target statistical power for the t-test's sample-size analysis
pub const DEFAULT_POWER: f64 = 0.8;

/// Default base seed for the per-invocation random generators
pub const DEFAULT_SEED: u64 = 8;
