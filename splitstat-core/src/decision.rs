//! Decision Policy
//!
//! Shared mapping from (p-value, confidence interval) to the three-way
//! verdict used by the mean-difference procedures. The Mann-Whitney
//! procedure applies the same policy against a 0.5 null value with its own
//! phrasing; see `procedure::mannwhitney`.

use crate::result::{Decision, Direction};

/// Classify a mean-difference effect.
///
/// The straddle check is inclusive: an interval touching 0 at either bound
/// still counts as unresolved direction.
pub fn mean_difference_decision(
    p_value: f64,
    alpha: f64,
    ci: (f64, f64),
) -> (Decision, Option<Direction>, String) {
    let (ci_lo, ci_hi) = ci;

    if p_value > alpha {
        let reason =
            format!("p value > alpha; {p_value} > {alpha}; no meaningful difference between averages");
        return (Decision::Reject, None, reason);
    }

    if ci_lo <= 0.0 && 0.0 <= ci_hi {
        let reason = format!(
            "p value < alpha; {p_value} < {alpha}, but 0 is in CI ({ci_lo}, {ci_hi}), \
             not sure about difference direction"
        );
        return (Decision::KeepRunning, None, reason);
    }

    let direction = if ci_hi < 0.0 {
        Direction::Negative
    } else {
        Direction::Positive
    };
    let reason = format!("p value < alpha; {p_value} < {alpha}; 0 is not in CI ({ci_lo}, {ci_hi})");

    (Decision::Accept, Some(direction), reason)
}

/// Classify a stochastic-superiority effect (a12, null value 0.5).
///
/// Decision ordering follows the rank-based procedure: a fully-below
/// interval resolves negative, a fully-above interval positive, and an
/// interval touching 0.5 keeps the experiment running. Unlike the
/// mean-difference policy, the undecided branch still carries a direction
/// hint from the a12 point estimate.
pub fn stochastic_superiority_decision(
    p_value: f64,
    alpha: f64,
    ci: (f64, f64),
    a12: f64,
) -> (Decision, Option<Direction>, String) {
    let (ci_lo, ci_hi) = ci;

    if p_value > alpha {
        let reason = format!("p value > alpha: {p_value} > {alpha}; no stochastic difference");
        return (Decision::Reject, None, reason);
    }

    if ci_hi < 0.5 {
        let reason = format!(
            "p value < alpha: {p_value} < {alpha}; B is stochastically less than A; \
             a12 CI ({ci_lo}, {ci_hi})"
        );
        return (Decision::Accept, Some(Direction::Negative), reason);
    }

    if ci_lo > 0.5 {
        let reason = format!(
            "p value < alpha: {p_value} < {alpha}; B is stochastically greater than A; \
             a12 CI ({ci_lo}, {ci_hi})"
        );
        return (Decision::Accept, Some(Direction::Positive), reason);
    }

    // Undecided, but the point estimate still hints at a direction.
    let hint = if a12 > 0.5 {
        Some(Direction::Positive)
    } else if a12 < 0.5 {
        Some(Direction::Negative)
    } else {
        None
    };
    let reason = format!(
        "p value < alpha: {p_value} < {alpha}; not enough data to check statistically \
         significant difference; a12 CI ({ci_lo}, {ci_hi})"
    );
    (Decision::KeepRunning, hint, reason)
}
