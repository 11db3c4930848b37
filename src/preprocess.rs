use alloc::vec::Vec;

use num_traits::Float;

use crate::helper::{mean, pstddev};

/// Conventional z-score cutoff for [`remove_outliers`]
///
/// For `f32` or other float types use [`default_outlier_threshold`].
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

/// Returns [`DEFAULT_OUTLIER_THRESHOLD`] in the caller's float type
///
/// # Examples
///
/// ```
/// use ta_correlation::{default_outlier_threshold, remove_outliers};
///
/// let xs: [f32; 4] = [1.0, 2.0, 3.0, 4.0];
/// let ys: [f32; 4] = [4.0, 3.0, 2.0, 1.0];
/// let (x, _) = remove_outliers(&xs, &ys, default_outlier_threshold());
/// assert_eq!(x.len(), 4);
/// ```
#[inline]
pub fn default_outlier_threshold<T: Float>() -> T {
    let one = T::one();
    one + one + one
}

/// Standardizes a series to zero mean and unit population standard deviation
///
/// Each element becomes `(x - mean) / std`, with `std` computed with divisor `N`.
/// A constant series has zero deviation and produces NaN values, which is left
/// to IEEE semantics rather than guarded.
///
/// # Arguments
///
/// * `xs` - The series to standardize
///
/// # Returns
///
/// * `Vec<T>` - The standardized series, same length as the input
///
/// # Examples
///
/// ```
/// use ta_correlation::standardize;
/// use assert_approx_eq::assert_approx_eq;
///
/// let z: Vec<f64> = standardize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// let expected: [f64; 8] = [-1.5, -0.5, -0.5, -0.5, 0.0, 0.0, 1.0, 2.0];
/// for (e, v) in expected.iter().zip(&z) {
///     assert_approx_eq!(e, v);
/// }
/// ```
pub fn standardize<T: Float + Default>(xs: &[T]) -> Vec<T> {
    let mean = mean(xs);
    let std = pstddev(xs, mean);
    xs.iter().map(|&x| (x - mean) / std).collect()
}

/// Returns the percentage change between consecutive observations
///
/// Element `i` of the output is `(xs[i + 1] - xs[i]) / xs[i] * 100`. A zero
/// observation makes the following change infinite (or NaN).
///
/// # Arguments
///
/// * `xs` - The series of levels, e.g. closing prices
///
/// # Returns
///
/// * `Vec<T>` - The changes, one shorter than the input and empty for fewer than two values
///
/// # Examples
///
/// ```
/// use ta_correlation::pct_change;
/// use assert_approx_eq::assert_approx_eq;
///
/// let changes: Vec<f64> = pct_change(&[100.0, 110.0, 99.0]);
/// assert_eq!(changes.len(), 2);
/// assert_approx_eq!(changes[0], 10.0);
/// assert_approx_eq!(changes[1], -10.0);
/// ```
pub fn pct_change<T: Float>(xs: &[T]) -> Vec<T> {
    let hundred = T::from(100.0).unwrap_or_else(T::nan);
    xs.windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * hundred)
        .collect()
}

/// Returns the absolute z-score of every element, `|x - mean| / std`
///
/// The standard deviation is the population one. A constant series yields NaN
/// for every element.
///
/// # Examples
///
/// ```
/// use ta_correlation::zscores;
/// use assert_approx_eq::assert_approx_eq;
///
/// let z: Vec<f64> = zscores(&[1.0, 3.0]);
/// assert_approx_eq!(z[0], 1.0);
/// assert_approx_eq!(z[1], 1.0);
/// ```
pub fn zscores<T: Float + Default>(xs: &[T]) -> Vec<T> {
    let mean = mean(xs);
    let std = pstddev(xs, mean);
    xs.iter().map(|&x| ((x - mean) / std).abs()).collect()
}

/// Removes paired observations where either side is an outlier
///
/// Z-scores are computed independently for `xs` and `ys`. Position `i` survives
/// only if both `|z_x[i]|` and `|z_y[i]|` are strictly below `threshold`, so an
/// outlier in either series drops the pair from both outputs and the surviving
/// values stay aligned. Order is preserved.
///
/// Positions with a NaN z-score never survive; in particular a constant series
/// removes every pair.
///
/// # Arguments
///
/// * `xs` - The first series
/// * `ys` - The second series, aligned with `xs`
/// * `threshold` - The z-score cutoff, see [`DEFAULT_OUTLIER_THRESHOLD`] and [`default_outlier_threshold`]
///
/// # Returns
///
/// * `(Vec<T>, Vec<T>)` - The filtered series, equal in length
///
/// # Panics
///
/// Panics if `xs` and `ys` differ in length.
///
/// # Examples
///
/// ```
/// use ta_correlation::remove_outliers;
///
/// let (x, y) = remove_outliers(&[1.0, 2.0, 3.0, 100.0], &[1.0, 2.0, 3.0, 4.0], 1.5);
/// assert_eq!(x, vec![1.0, 2.0, 3.0]);
/// assert_eq!(y, vec![1.0, 2.0, 3.0]);
/// ```
pub fn remove_outliers<T: Float + Default>(xs: &[T], ys: &[T], threshold: T) -> (Vec<T>, Vec<T>) {
    assert_eq!(
        xs.len(),
        ys.len(),
        "paired series must have the same length"
    );

    let (zx, zy) = (zscores(xs), zscores(ys));
    let (kept_x, kept_y): (Vec<T>, Vec<T>) = xs
        .iter()
        .zip(ys)
        .zip(zx.iter().zip(&zy))
        .filter(|(_, (za, zb))| **za < threshold && **zb < threshold)
        .map(|((&x, &y), _)| (x, y))
        .unzip();

    let removed = xs.len() - kept_x.len();
    if removed > 0 {
        tracing::debug!(removed, total = xs.len(), "removed paired outliers");
    }

    (kept_x, kept_y)
}
