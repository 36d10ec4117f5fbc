//! T-Test with Power Analysis
//!
//! Before testing, solves the minimum per-group sample size needed to
//! detect the metric's target effect at the configured power. Undersized
//! groups pre-set the decision to KEEP_RUNNING but the test still runs; the
//! statistical outcome can only tighten that verdict, never loosen it.
//!
//! The t-test itself runs on the bootstrap-mean distributions of the two
//! arms rather than on the raw samples.

use crate::config::AnalysisConfig;
use crate::metric::Metric;
use crate::procedure::{TestError, TestKind};
use crate::result::{ArmSamples, Decision, Direction, TestResult, VisInfo};
use splitstat_stats::{
    bootstrap_means, mean, population_std, required_group_size, two_sample_t,
};

/// Solve the per-group requirement for this metric against these samples.
///
/// The target absolute effect is standardized by the control group's
/// (population) standard deviation; a zero-variance control makes any shift
/// detectable, collapsing the requirement to the minimum viable group of 2.
fn sufficient_group_sizes(
    a: &[f64],
    b: &[f64],
    alpha: f64,
    power: f64,
    metric: Metric,
) -> Result<(bool, f64), TestError> {
    let control_std = population_std(a);
    let standardized = if control_std > 0.0 {
        metric.target_effect() / control_std
    } else {
        f64::INFINITY
    };

    let ratio = b.len() as f64 / a.len() as f64;
    let required = required_group_size(standardized, alpha, power, ratio)?;

    let sufficient = a.len() as f64 >= required && b.len() as f64 >= required;
    Ok((sufficient, required))
}

pub(super) fn run(
    experiment: &str,
    metric: Metric,
    samples: &ArmSamples,
    cfg: &AnalysisConfig,
) -> Result<TestResult, TestError> {
    let a = &samples.control;
    let b = &samples.treatment;
    let mut rng = cfg.rng();

    let (sufficient, required) = sufficient_group_sizes(a, b, cfg.alpha, cfg.power, metric)?;

    let mut preset: Option<Decision> = None;
    let mut reason = String::new();
    if !sufficient {
        reason = format!(
            "not sufficient group sizes; group sizes a={} b={}; required sample size: {required}",
            a.len(),
            b.len(),
        );
        preset = Some(Decision::KeepRunning);
        tracing::warn!(
            experiment,
            metric = metric.as_str(),
            "in t-test there are {reason}"
        );
    }

    let n_resamples = cfg.n_resamples.max(required as usize);

    let boot_a = bootstrap_means(&mut rng, a, n_resamples);
    let boot_b = bootstrap_means(&mut rng, b, n_resamples);

    let t = two_sample_t(&boot_b, &boot_a)?;
    let p_value = t.p_value;
    let ci = t.confidence_interval(1.0 - cfg.alpha)?;
    let (ci_lo, ci_hi) = ci;
    let alpha = cfg.alpha;

    let mut direction = None;
    let decision = if p_value > alpha {
        if reason.is_empty() {
            reason = format!(
                "p value > alpha; {p_value} > {alpha}; no meaningful difference between averages"
            );
        }
        preset.unwrap_or(Decision::Reject)
    } else if ci_lo <= 0.0 && 0.0 <= ci_hi {
        let local = format!(
            "p value < alpha; {p_value} < {alpha}, but 0 is in CI ({ci_lo}, {ci_hi}), \
             not sure about difference direction"
        );
        append_reason(&mut reason, local);
        Decision::KeepRunning
    } else {
        let local =
            format!("p value < alpha; {p_value} < {alpha}; 0 is not in CI ({ci_lo}, {ci_hi})");
        append_reason(&mut reason, local);

        let decision = preset.unwrap_or(Decision::Accept);
        if decision == Decision::Accept {
            direction = Some(if ci_hi < 0.0 {
                Direction::Negative
            } else {
                Direction::Positive
            });
        }
        decision
    };

    let delta_distribution: Vec<f64> = boot_b
        .iter()
        .zip(boot_a.iter())
        .map(|(mb, ma)| mb - ma)
        .collect();

    Ok(TestResult {
        experiment: experiment.to_string(),
        test: TestKind::TTest,
        metric,
        p_value,
        decision,
        direction,
        ci: Some(ci),
        reason,
        vis: VisInfo {
            resample_distribution: delta_distribution,
            effect: mean(&boot_b) - mean(&boot_a),
            null_distribution: None,
        },
    })
}

fn append_reason(reason: &mut String, local: String) {
    if reason.is_empty() {
        *reason = local;
    } else {
        reason.push_str("; ");
        reason.push_str(&local);
    }
}
