//! Sample Preparation
//!
//! Resolves arm assignments for one experiment, drops users whose
//! assignment changed over the window, and aggregates per user into the
//! sample pair a test procedure consumes.

use crate::schema::{Assignment, EventFrame};
use chrono::{Duration, NaiveDate};
use fxhash::{FxHashMap, FxHashSet};
use splitstat_core::{Arm, ArmSamples, Metric};
use thiserror::Error;

/// Errors from sample preparation
#[derive(Debug, Clone, Error)]
pub enum PrepError {
    /// The experiment flag never appears in the users logs
    #[error("unknown experiment: {0}")]
    UnknownExperiment(String),
}

/// One row of the merged frame with the arm resolved for a single experiment
#[derive(Debug, Clone)]
pub struct PreparedRow {
    /// User identifier
    pub user_id: String,
    /// Observation day
    pub date: NaiveDate,
    /// Resolved arm
    pub arm: Arm,
    /// Messages sent
    pub messages_count: f64,
    /// Payment amount
    pub price_usd: f64,
}

/// Resolve arms for `experiment` and drop unusable users.
///
/// A user observed with conflicting labels across days (including drifting
/// in or out of enrollment) is excluded entirely, with a warning: group
/// hopping makes their data unattributable.
pub fn prepare_for_experiment(
    frame: &EventFrame,
    experiment: &str,
) -> Result<Vec<PreparedRow>, PrepError> {
    if !frame.experiments.iter().any(|e| e == experiment) {
        return Err(PrepError::UnknownExperiment(experiment.to_string()));
    }

    let mut assignment_by_user: FxHashMap<&str, Assignment> = FxHashMap::default();
    let mut hoppers: FxHashSet<&str> = FxHashSet::default();

    for row in &frame.rows {
        let assignment = Assignment::from_flag(row.flags.get(experiment).copied().flatten());
        match assignment_by_user.entry(row.user_id.as_str()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(assignment);
            }
            std::collections::hash_map::Entry::Occupied(slot) => {
                if *slot.get() != assignment {
                    hoppers.insert(row.user_id.as_str());
                }
            }
        }
    }

    if !hoppers.is_empty() {
        tracing::warn!(
            experiment,
            count = hoppers.len(),
            "users change their A/B groups"
        );
    }

    let mut prepared = Vec::new();
    for row in &frame.rows {
        if hoppers.contains(row.user_id.as_str()) {
            continue;
        }
        let arm = match Assignment::from_flag(row.flags.get(experiment).copied().flatten()) {
            Assignment::Excluded => continue,
            Assignment::Control => Arm::Control,
            Assignment::Treatment => Arm::Treatment,
        };
        prepared.push(PreparedRow {
            user_id: row.user_id.clone(),
            date: row.date,
            arm,
            messages_count: row.messages_count,
            price_usd: row.price_usd,
        });
    }

    Ok(prepared)
}

/// Per-user aggregated samples for one (experiment, metric) pair.
pub fn ab_samples(
    frame: &EventFrame,
    experiment: &str,
    metric: Metric,
) -> Result<ArmSamples, PrepError> {
    let rows = prepare_for_experiment(frame, experiment)?;

    Ok(match metric {
        Metric::Arpu => sum_per_user(&rows, |r| r.price_usd),
        Metric::Messages => sum_per_user(&rows, |r| r.messages_count),
        Metric::UserRetention => retention_per_user(&rows),
    })
}

fn split_by_arm(mut entries: Vec<(&str, Arm, f64)>) -> ArmSamples {
    // Deterministic sample order regardless of map iteration.
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut samples = ArmSamples::default();
    for (_, arm, value) in entries {
        match arm {
            Arm::Control => samples.control.push(value),
            Arm::Treatment => samples.treatment.push(value),
        }
    }
    samples
}

fn sum_per_user(rows: &[PreparedRow], value: impl Fn(&PreparedRow) -> f64) -> ArmSamples {
    let mut per_user: FxHashMap<&str, (Arm, f64)> = FxHashMap::default();
    for row in rows {
        let entry = per_user.entry(row.user_id.as_str()).or_insert((row.arm, 0.0));
        entry.1 += value(row);
    }

    split_by_arm(
        per_user
            .into_iter()
            .map(|(user, (arm, total))| (user, arm, total))
            .collect(),
    )
}

/// Retention: 1 when the user shows up exactly one day after their first
/// observed day, 0 otherwise.
fn retention_per_user(rows: &[PreparedRow]) -> ArmSamples {
    let mut first_day: FxHashMap<&str, NaiveDate> = FxHashMap::default();
    for row in rows {
        first_day
            .entry(row.user_id.as_str())
            .and_modify(|day| *day = (*day).min(row.date))
            .or_insert(row.date);
    }

    let mut retained: FxHashMap<&str, (Arm, bool)> = FxHashMap::default();
    for row in rows {
        let next_day = first_day[row.user_id.as_str()] + Duration::days(1);
        let entry = retained.entry(row.user_id.as_str()).or_insert((row.arm, false));
        entry.1 |= row.date == next_day;
    }

    split_by_arm(
        retained
            .into_iter()
            .map(|(user, (arm, came_back))| (user, arm, if came_back { 1.0 } else { 0.0 }))
            .collect(),
    )
}
