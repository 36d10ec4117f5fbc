//! Experiment Metrics

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A per-user metric an experiment is evaluated on.
///
/// Each metric carries the absolute effect the product considers worth
/// detecting, used by the t-test's power analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Average revenue per user (sum of payment amounts)
    Arpu,
    /// Messages sent per user
    Messages,
    /// Next-day retention indicator (0/1)
    UserRetention,
}

impl Metric {
    /// All known metrics
    pub const ALL: [Metric; 3] = [Metric::Arpu, Metric::Messages, Metric::UserRetention];

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Arpu => "arpu",
            Metric::Messages => "messages",
            Metric::UserRetention => "user_retention",
        }
    }

    /// Target absolute effect size for the power analysis
    pub fn target_effect(&self) -> f64 {
        match self {
            Metric::Arpu => 0.5,
            Metric::Messages => 5.0,
            Metric::UserRetention => 0.08,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a metric name has no typed counterpart
#[derive(Debug, Clone, Error)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arpu" => Ok(Metric::Arpu),
            "messages" => Ok(Metric::Messages),
            "user_retention" => Ok(Metric::UserRetention),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_unknown_metric_fails_fast() {
        assert!("conversion".parse::<Metric>().is_err());
    }

    #[test]
    fn test_effect_table() {
        assert_eq!(Metric::Arpu.target_effect(), 0.5);
        assert_eq!(Metric::Messages.target_effect(), 5.0);
        assert_eq!(Metric::UserRetention.target_effect(), 0.08);
    }
}
