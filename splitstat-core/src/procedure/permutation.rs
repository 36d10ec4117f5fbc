//! Permutation Test
//!
//! Two-sided permutation p-value for the mean difference, with an
//! independent percentile bootstrap confidence interval for the same
//! statistic.

use crate::config::AnalysisConfig;
use crate::decision::mean_difference_decision;
use crate::metric::Metric;
use crate::procedure::{TestError, TestKind};
use crate::result::{ArmSamples, TestResult, VisInfo};
use splitstat_stats::{
    bootstrap_statistic, mean, percentile_interval, permutation_p_value, permutation_statistic,
};

fn diff_means(x: &[f64], y: &[f64]) -> f64 {
    mean(y) - mean(x)
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

    let delta = mean(b) - mean(a);

    let null = permutation_statistic(&mut rng, a, b, cfg.n_resamples, diff_means);
    let p_value = permutation_p_value(&null, delta);

    let boots = bootstrap_statistic(&mut rng, a, b, cfg.n_resamples, diff_means);
    let ci = percentile_interval(&boots, 1.0 - cfg.alpha);

    let (decision, direction, reason) = mean_difference_decision(p_value, cfg.alpha, ci);

    Ok(TestResult {
        experiment: experiment.to_string(),
        test: TestKind::Permutation,
        metric,
        p_value,
        decision,
        direction,
        ci: Some(ci),
        reason,
        vis: VisInfo {
            resample_distribution: boots,
            effect: delta,
            null_distribution: Some(null),
        },
    })
}
