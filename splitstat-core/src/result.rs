//! Result Contract
//!
//! The uniform output record every test procedure produces, plus the sample
//! pair they consume.

use crate::metric::Metric;
use crate::procedure::TestKind;
use serde::{Deserialize, Serialize};

/// One side of an A/B experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arm {
    /// The unchanged baseline group
    Control,
    /// The group exposed to the change under test
    Treatment,
}

impl std::fmt::Display for Arm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arm::Control => f.write_str("control"),
            Arm::Treatment => f.write_str("treatment"),
        }
    }
}

/// Per-user aggregated samples for both arms of one (experiment, metric) pair.
///
/// Values come exclusively from users whose arm assignment never changed
/// over the observation window.
#[derive(Debug, Clone, Default)]
pub struct ArmSamples {
    /// Control-arm values, one per user
    pub control: Vec<f64>,
    /// Treatment-arm values, one per user
    pub treatment: Vec<f64>,
}

impl ArmSamples {
    /// Bundle two per-user sample vectors
    pub fn new(control: Vec<f64>, treatment: Vec<f64>) -> Self {
        Self { control, treatment }
    }
}

/// Verdict of a single test on a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Statistically significant difference with a resolved direction
    Accept,
    /// No detectable difference
    Reject,
    /// Inconclusive; the experiment needs more data
    KeepRunning,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Accept => f.write_str("ACCEPT"),
            Decision::Reject => f.write_str("REJECT"),
            Decision::KeepRunning => f.write_str("KEEP_RUNNING"),
        }
    }
}

/// Direction of a detected effect, treatment relative to control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Treatment moves the metric down
    Negative,
    /// Treatment moves the metric up
    Positive,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Negative => f.write_str("-"),
            Direction::Positive => f.write_str("+"),
        }
    }
}

/// Auxiliary payload for visualization; opaque to the procedures themselves
#[derive(Debug, Clone, Default)]
pub struct VisInfo {
    /// Resampled distribution of the effect statistic
    pub resample_distribution: Vec<f64>,
    /// Point estimate of the effect (mean delta, or a12 for rank tests)
    pub effect: f64,
    /// Null distribution, when the procedure builds one
    pub null_distribution: Option<Vec<f64>>,
}

/// The uniform output record of every test procedure.
///
/// Created once per (test, metric, experiment) cell, immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Experiment identifier (flag name)
    pub experiment: String,
    /// Which procedure produced this result
    pub test: TestKind,
    /// Metric under test
    pub metric: Metric,
    /// p-value in [0, 1]
    pub p_value: f64,
    /// The three-way verdict
    pub decision: Decision,
    /// Effect direction; only reported alongside a resolved decision
    pub direction: Option<Direction>,
    /// Two-sided confidence interval for the effect, when one was built
    pub ci: Option<(f64, f64)>,
    /// Human-readable justification carrying p, alpha, and the CI bounds
    pub reason: String,
    /// Visualization payload, not serialized with the decision record
    #[serde(skip)]
    pub vis: VisInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_rendering() {
        assert_eq!(Decision::Accept.to_string(), "ACCEPT");
        assert_eq!(Decision::Reject.to_string(), "REJECT");
        assert_eq!(Decision::KeepRunning.to_string(), "KEEP_RUNNING");
    }

    #[test]
    fn test_direction_rendering() {
        assert_eq!(Direction::Negative.to_string(), "-");
        assert_eq!(Direction::Positive.to_string(), "+");
    }

    #[test]
    fn test_decision_serde_names() {
        let json = serde_json::to_string(&Decision::KeepRunning).unwrap();
        assert_eq!(json, "\"KEEP_RUNNING\"");
    }
}
