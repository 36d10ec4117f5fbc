//! Bootstrap Test
//!
//! Same statistic and confidence interval as the permutation test, but the
//! p-value comes from the bootstrap distribution itself: the fraction of
//! resampled mean differences at or above the observed delta.

use crate::config::AnalysisConfig;
use crate::decision::mean_difference_decision;
use crate::metric::Metric;
use crate::procedure::{TestError, TestKind};
use crate::result::{ArmSamples, TestResult, VisInfo};
use splitstat_stats::{bootstrap_statistic, mean, percentile_interval};

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

    let boots = bootstrap_statistic(&mut rng, a, b, cfg.n_resamples, diff_means);

    // One-sided tail fraction, kept as-is.
    // Two-sided variant:
    // let p_value = boots.iter().filter(|d| d.abs() >= delta.abs()).count() as f64
    //     / boots.len() as f64;
    let p_value = boots.iter().filter(|&&d| d >= delta).count() as f64 / boots.len() as f64;

    let ci = percentile_interval(&boots, 1.0 - cfg.alpha);

    let (decision, direction, reason) = mean_difference_decision(p_value, cfg.alpha, ci);

    Ok(TestResult {
        experiment: experiment.to_string(),
        test: TestKind::Bootstrap,
        metric,
        p_value,
        decision,
        direction,
        ci: Some(ci),
        reason,
        vis: VisInfo {
            resample_distribution: boots,
            effect: delta,
            null_distribution: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Decision;

    fn cfg(n_resamples: usize) -> AnalysisConfig {
        AnalysisConfig {
            n_resamples,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_identical_samples_reject() {
        // Every resampled delta equals the observed 0: tail fraction 1.
        let samples = ArmSamples::new(vec![1.0; 5], vec![1.0; 5]);
        let result = run("exp_b", Metric::Arpu, &samples, &cfg(500)).unwrap();

        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.decision, Decision::Reject);
        assert_eq!(result.direction, None);
    }

    #[test]
    fn test_zero_variance_separation() {
        // With no within-arm variance every resampled delta is exactly the
        // observed one. The one-sided tail fraction is 1, so even a total
        // separation rejects; the CI still sits entirely above zero.
        let samples = ArmSamples::new(vec![0.0; 50], vec![10.0; 50]);
        let result = run("exp_b", Metric::Arpu, &samples, &cfg(500)).unwrap();

        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.decision, Decision::Reject);
        assert_eq!(result.ci, Some((10.0, 10.0)));
        assert_eq!(result.vis.effect, 10.0);
    }

    #[test]
    fn test_tail_fraction_centers_near_half() {
        // The bootstrap distribution centers on the observed delta, so the
        // tail fraction hovers around 0.5 for symmetric data.
        let a: Vec<f64> = (0..60).map(|i| (i % 5) as f64).collect();
        let b: Vec<f64> = (0..60).map(|i| 8.0 + (i % 5) as f64).collect();
        let samples = ArmSamples::new(a, b);

        let result = run("exp_b", Metric::Arpu, &samples, &cfg(500)).unwrap();
        assert!((0.35..=0.65).contains(&result.p_value));
        assert_eq!(result.decision, Decision::Reject);
    }

    #[test]
    fn test_single_resample_does_not_crash() {
        let samples = ArmSamples::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]);
        let result = run("exp_b", Metric::Arpu, &samples, &cfg(1)).unwrap();

        let (lo, hi) = result.ci.unwrap();
        assert_eq!(lo, hi);
        assert!((0.0..=1.0).contains(&result.p_value));
    }

    #[test]
    fn test_determinism() {
        let samples = ArmSamples::new(
            (0..25).map(|i| (i % 4) as f64).collect(),
            (0..25).map(|i| (i % 7) as f64).collect(),
        );
        let config = cfg(300);

        let first = run("exp_b", Metric::Messages, &samples, &config).unwrap();
        let second = run("exp_b", Metric::Messages, &samples, &config).unwrap();

        assert_eq!(first.p_value, second.p_value);
        assert_eq!(first.ci, second.ci);
        assert_eq!(first.decision, second.decision);
    }

    #[test]
    fn test_reason_carries_numbers() {
        let samples = ArmSamples::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]);
        let result = run("exp_b", Metric::Arpu, &samples, &cfg(200)).unwrap();

        assert!(result.reason.contains("p value > alpha"));
        assert!(result.reason.contains("0.12"));
    }
}
