use num_traits::Float;

use crate::Kbn;

/// Converts a count into `T`, falling back to NaN if it is not representable
#[inline]
pub fn len_t<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

/// Returns the arithmetic mean of a slice
///
/// # Arguments
///
/// * `xs` - The values
///
/// # Returns
///
/// * `T` - The mean, NaN for an empty slice
#[inline]
pub fn mean<T: Float + Default>(xs: &[T]) -> T {
    let mut sum = Kbn::default();
    for &x in xs {
        sum += x;
    }
    sum.total() / len_t(xs.len())
}

/// Returns the population variance (divisor `N`) of a slice around `mean`
#[inline]
pub fn pvariance<T: Float + Default>(xs: &[T], mean: T) -> T {
    let mut sum_sq = Kbn::default();
    for &x in xs {
        let dev = x - mean;
        sum_sq += dev * dev;
    }
    sum_sq.total() / len_t(xs.len())
}

/// Returns the population standard deviation of a slice around `mean`
#[inline]
pub fn pstddev<T: Float + Default>(xs: &[T], mean: T) -> T {
    pvariance(xs, mean).sqrt()
}

/// Returns the covariance matrix of `N` equally long slices
///
/// Entry `[a][b]` is the covariance between `series[a]` and `series[b]`, the
/// diagonal holds the variances. Deviations are taken from each slice's own
/// mean and the sum of products is divided by `len - ddof`.
///
/// The rolling beta paths go through this routine with `ddof = 1`, so a
/// two-series and a three-series call over the same window produce identical
/// entries for the pairs they share.
///
/// # Arguments
///
/// * `series` - The slices, all of the same length
/// * `ddof` - Delta degrees of freedom
///
/// # Returns
///
/// * `[[T; N]; N]` - The symmetric covariance matrix
pub fn covariance_matrix<T, const N: usize>(series: [&[T]; N], ddof: usize) -> [[T; N]; N]
where
    T: Float + Default,
{
    let len = series.first().map_or(0, |s| s.len());
    debug_assert!(series.iter().all(|s| s.len() == len));

    let means: [T; N] = core::array::from_fn(|k| mean(series[k]));
    let mut sums: [[Kbn<T>; N]; N] =
        core::array::from_fn(|_| core::array::from_fn(|_| Kbn::default()));

    for j in 0..len {
        let dev: [T; N] = core::array::from_fn(|k| series[k][j] - means[k]);
        for (a, row) in sums.iter_mut().enumerate() {
            for (b, sum) in row.iter_mut().enumerate().skip(a) {
                *sum += dev[a] * dev[b];
            }
        }
    }

    let denom = len_t::<T>(len) - len_t(ddof);
    let mut cov = [[T::zero(); N]; N];
    for a in 0..N {
        for b in a..N {
            let c = sums[a][b].total() / denom;
            cov[a][b] = c;
            cov[b][a] = c;
        }
    }
    cov
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn mean_and_population_variance() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&xs);
        assert_eq!(m, 5.0);
        assert_eq!(pvariance(&xs, m), 4.0);
        assert_eq!(pstddev(&xs, m), 2.0);
    }

    #[test]
    fn mean_of_empty_is_nan() {
        let xs: [f64; 0] = [];
        assert!(mean(&xs).is_nan());
    }

    #[test]
    fn covariance_matrix_sample() {
        let x = [2.0, 4.0, 6.0];
        let y = [1.0, 3.0, 2.0];
        let cov = covariance_matrix([&x[..], &y[..]], 1);
        assert_approx_eq!(cov[0][0], 4.0);
        assert_approx_eq!(cov[1][1], 1.0);
        assert_approx_eq!(cov[0][1], 1.0);
        assert_eq!(cov[0][1], cov[1][0]);
    }

    #[test]
    fn covariance_matrix_shared_pairs_match() {
        let a = [0.011, -0.004, 0.021, 0.007, -0.013];
        let b = [0.002, 0.009, -0.017, 0.004, 0.001];
        let m = [0.006, -0.002, 0.010, 0.003, -0.008];

        let pair = covariance_matrix([&a[..], &m[..]], 1);
        let triple = covariance_matrix([&a[..], &b[..], &m[..]], 1);

        assert_eq!(pair[0][1], triple[0][2]);
        assert_eq!(pair[1][1], triple[2][2]);
    }

    #[test]
    fn covariance_matrix_single_observation_is_nan() {
        let x = [1.0];
        let cov = covariance_matrix([&x[..]], 1);
        assert!(cov[0][0].is_nan());
    }
}
