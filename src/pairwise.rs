use alloc::vec::Vec;

use num_traits::Float;

use crate::{MetricsTriple, beta_correlation, compute_pearson, rolling_beta};

/// Correlation metrics for one pair out of a set of series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairMetrics<T> {
    /// Index of the first series, always lower than `right`
    pub left: usize,
    /// Index of the second series
    pub right: usize,
    /// Metrics of the pair
    pub metrics: MetricsTriple<T>,
}

/// Computes the correlation metrics of every pair in a set of return series
///
/// This produces the edge list of a correlation network: one entry per
/// unordered pair `(left, right)` with `left < right`, ordered by `left` and
/// then `right`. Each entry equals
/// [`compute_correlation_metrics`](crate::compute_correlation_metrics) on that
/// pair, but every series' rolling beta is computed once and reused for all
/// the pairs it takes part in.
///
/// # Arguments
///
/// * `series` - The return series, all aligned with `market`
/// * `market` - The market's returns
/// * `window` - The number of trailing observations per beta estimate
///
/// # Returns
///
/// * `Vec<PairMetrics<T>>` - One entry per pair, empty for fewer than two series
///
/// # Panics
///
/// Panics if `window` is zero or if any series differs in length from `market`.
///
/// # Examples
///
/// ```
/// use ta_correlation::pairwise_metrics;
///
/// let market = [0.010, -0.004, 0.007, 0.012, -0.009, 0.003, 0.006, -0.002];
/// let series = [
///     vec![0.014, -0.006, 0.011, 0.015, -0.012, 0.002, 0.009, -0.001],
///     vec![0.007, -0.003, 0.004, 0.010, -0.006, 0.004, 0.003, -0.003],
///     vec![-0.002, 0.005, 0.001, -0.004, 0.006, 0.000, -0.001, 0.003],
/// ];
///
/// let links = pairwise_metrics(&series, &market, 3);
/// let pairs: Vec<_> = links.iter().map(|p| (p.left, p.right)).collect();
/// assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
/// ```
pub fn pairwise_metrics<T, S>(series: &[S], market: &[T], window: usize) -> Vec<PairMetrics<T>>
where
    T: Float + Default,
    S: AsRef<[T]>,
{
    let betas: Vec<Vec<T>> = series
        .iter()
        .map(|s| rolling_beta(s.as_ref(), market, window))
        .collect();

    let n = series.len();
    let mut links = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for left in 0..n {
        for right in left + 1..n {
            let pearson_correlation =
                compute_pearson(series[left].as_ref(), series[right].as_ref());
            links.push(PairMetrics {
                left,
                right,
                metrics: MetricsTriple {
                    pearson_correlation,
                    beta_correlation: beta_correlation(&betas[left], &betas[right], window),
                    r_squared: pearson_correlation * pearson_correlation,
                },
            });
        }
    }

    tracing::debug!(series = n, pairs = links.len(), window, "computed pairwise metrics");
    links
}
