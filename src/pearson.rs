use num_traits::Float;

use crate::{
    Kbn,
    helper::{len_t, mean, pstddev},
};

/// Returns the Pearson correlation coefficient of two aligned series
///
/// Correlation normalizes the co-movement of two series by the product of their
/// standard deviations, giving a scale free measure of linear relationship:
///
/// - Quantifies how closely two return series move together
/// - Feeds pair selection and diversification analysis
/// - Is the basis of [`compute_r_squared`] and the beta correlation in
///   [`compute_correlation_metrics`](crate::compute_correlation_metrics)
///
/// Means and standard deviations use the population divisor `N`. When either
/// series is constant (standard deviation exactly zero) the result is floored
/// to `0.0` instead of NaN, keeping downstream aggregates well defined.
///
/// # Arguments
///
/// * `xs` - The first series
/// * `ys` - The second series, aligned with `xs`
///
/// # Returns
///
/// * `T` - The coefficient in `[-1, 1]` up to rounding, or `0.0` for a constant input
///
/// # Panics
///
/// Panics if `xs` and `ys` differ in length.
///
/// # Examples
///
/// ```
/// use ta_correlation::compute_pearson;
/// use assert_approx_eq::assert_approx_eq;
///
/// let x: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// assert_approx_eq!(compute_pearson(&x, &y), 1.0);
///
/// let flat = [1.0, 1.0, 1.0, 1.0, 1.0];
/// assert_eq!(compute_pearson(&flat, &y), 0.0);
/// ```
pub fn compute_pearson<T: Float + Default>(xs: &[T], ys: &[T]) -> T {
    assert_eq!(
        xs.len(),
        ys.len(),
        "paired series must have the same length"
    );

    let (mean_x, mean_y) = (mean(xs), mean(ys));
    let (std_x, std_y) = (pstddev(xs, mean_x), pstddev(ys, mean_y));

    if std_x.is_zero() || std_y.is_zero() {
        tracing::debug!("zero standard deviation, flooring correlation to 0");
        return T::zero();
    }

    let mut sum_xy = Kbn::default();
    for (&x, &y) in xs.iter().zip(ys) {
        sum_xy += (x - mean_x) * (y - mean_y);
    }

    sum_xy.total() / (len_t::<T>(xs.len()) * std_x * std_y)
}

/// Returns the coefficient of determination of two aligned series
///
/// This is the square of [`compute_pearson`] over the full series, so it lies in
/// `[0, 1]` and inherits the `0.0` floor for constant input.
///
/// # Panics
///
/// Panics if `xs` and `ys` differ in length.
///
/// # Examples
///
/// ```
/// use ta_correlation::compute_r_squared;
/// use assert_approx_eq::assert_approx_eq;
///
/// let x: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// assert_approx_eq!(compute_r_squared(&x, &y), 1.0);
/// ```
pub fn compute_r_squared<T: Float + Default>(xs: &[T], ys: &[T]) -> T {
    let r = compute_pearson(xs, ys);
    r * r
}
