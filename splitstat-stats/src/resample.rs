//! Resampling Primitives
//!
//! Bootstrap resampling (with replacement) and permutation resampling
//! (label shuffling) over two samples, producing the empirical distribution
//! of an arbitrary two-sample statistic.
//!
//! All primitives draw from a caller-owned [`StdRng`], so a given seed and
//! input pair reproduces the distribution bit for bit no matter where the
//! call runs.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Bootstrap distribution of a two-sample statistic.
///
/// Each of the `n_resamples` iterations draws `a.len()` values from `a` and
/// `b.len()` values from `b`, both with replacement, and evaluates
/// `statistic` on the resampled pair. Both samples must be non-empty.
pub fn bootstrap_statistic<F>(
    rng: &mut StdRng,
    a: &[f64],
    b: &[f64],
    n_resamples: usize,
    statistic: F,
) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let mut resample_a = vec![0.0; a.len()];
    let mut resample_b = vec![0.0; b.len()];

    (0..n_resamples)
        .map(|_| {
            for slot in resample_a.iter_mut() {
                *slot = a[rng.gen_range(0..a.len())];
            }
            for slot in resample_b.iter_mut() {
                *slot = b[rng.gen_range(0..b.len())];
            }
            statistic(&resample_a, &resample_b)
        })
        .collect()
}

/// One-sample bootstrap distribution of the mean.
///
/// `samples` must be non-empty.
pub fn bootstrap_means(rng: &mut StdRng, samples: &[f64], n_resamples: usize) -> Vec<f64> {
    (0..n_resamples)
        .map(|_| {
            let mut sum = 0.0;
            for _ in 0..samples.len() {
                sum += *samples.choose(rng).unwrap();
            }
            sum / samples.len() as f64
        })
        .collect()
}

/// Permutation null distribution of a two-sample statistic.
///
/// Pools `a` and `b`, and for each iteration shuffles the pool and splits it
/// back into groups of the original sizes, evaluating `statistic` on the
/// relabeled pair. Under label exchangeability this is the distribution of
/// the statistic when no true difference exists.
pub fn permutation_statistic<F>(
    rng: &mut StdRng,
    a: &[f64],
    b: &[f64],
    n_resamples: usize,
    statistic: F,
) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let mut pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();

    (0..n_resamples)
        .map(|_| {
            pooled.shuffle(rng);
            let (left, right) = pooled.split_at(a.len());
            statistic(left, right)
        })
        .collect()
}

/// Two-sided p-value of `observed` against a randomized permutation null.
///
/// Uses the (count + 1) / (n + 1) adjustment for randomly drawn permutations,
/// doubling the smaller tail and capping at 1.
pub fn permutation_p_value(null: &[f64], observed: f64) -> f64 {
    let n = null.len() as f64;
    let greater = null.iter().filter(|&&t| t >= observed).count() as f64;
    let less = null.iter().filter(|&&t| t <= observed).count() as f64;

    let p_greater = (greater + 1.0) / (n + 1.0);
    let p_less = (less + 1.0) / (n + 1.0);

    (2.0 * p_greater.min(p_less)).min(1.0)
}

/// Percentile confidence interval over an empirical distribution.
///
/// `values` must be non-empty. A single-value distribution collapses to a
/// degenerate (v, v) interval.
pub fn percentile_interval(values: &[f64], confidence: f64) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let alpha = (1.0 - confidence) / 2.0;

    let lower_idx = ((alpha * n as f64).floor() as usize).min(n - 1);
    let upper_idx = (((1.0 - alpha) * n as f64).floor() as usize).min(n - 1);

    (sorted[lower_idx], sorted[upper_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mean;
    use rand::SeedableRng;

    fn diff_means(x: &[f64], y: &[f64]) -> f64 {
        mean(y) - mean(x)
    }

    #[test]
    fn test_bootstrap_length_and_determinism() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![5.0, 6.0, 7.0];

        let mut rng = StdRng::seed_from_u64(8);
        let first = bootstrap_statistic(&mut rng, &a, &b, 500, diff_means);

        let mut rng = StdRng::seed_from_u64(8);
        let second = bootstrap_statistic(&mut rng, &a, &b, 500, diff_means);

        assert_eq!(first.len(), 500);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bootstrap_constant_samples() {
        let a = vec![2.0; 10];
        let b = vec![5.0; 10];
        let mut rng = StdRng::seed_from_u64(1);

        let dist = bootstrap_statistic(&mut rng, &a, &b, 100, diff_means);
        assert!(dist.iter().all(|&d| d == 3.0));
    }

    #[test]
    fn test_bootstrap_means_range() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(3);

        let means = bootstrap_means(&mut rng, &samples, 1000);
        assert_eq!(means.len(), 1000);
        assert!(means.iter().all(|&m| (1.0..=5.0).contains(&m)));
    }

    #[test]
    fn test_permutation_preserves_pool() {
        // Statistic of the pooled sum is invariant under relabeling.
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0];
        let mut rng = StdRng::seed_from_u64(7);

        let sums = permutation_statistic(&mut rng, &a, &b, 50, |x, y| {
            x.iter().sum::<f64>() + y.iter().sum::<f64>()
        });
        assert!(sums.iter().all(|&s| s == 15.0));
    }

    #[test]
    fn test_permutation_p_value_identical_samples() {
        let a = vec![1.0; 20];
        let b = vec![1.0; 20];
        let mut rng = StdRng::seed_from_u64(11);

        let null = permutation_statistic(&mut rng, &a, &b, 200, diff_means);
        let p = permutation_p_value(&null, 0.0);
        assert!(p > 0.9);
    }

    #[test]
    fn test_permutation_p_value_extreme_observed() {
        let null = vec![0.0; 999];
        let p = permutation_p_value(&null, 100.0);
        // Only the +1 adjustment keeps this above zero.
        assert!(p > 0.0);
        assert!(p < 0.01);
    }

    #[test]
    fn test_percentile_interval_bounds() {
        let values: Vec<f64> = (0..1000).map(|x| x as f64).collect();
        let (lo, hi) = percentile_interval(&values, 0.9);
        assert!((lo - 50.0).abs() <= 1.0);
        assert!((hi - 950.0).abs() <= 1.0);
    }

    #[test]
    fn test_percentile_interval_single_value() {
        let (lo, hi) = percentile_interval(&[42.0], 0.88);
        assert_eq!(lo, 42.0);
        assert_eq!(hi, 42.0);
    }
}
