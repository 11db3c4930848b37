use alloc::vec::Vec;

use num_traits::Float;

use crate::{Window, helper::covariance_matrix};

/// Divides a sample covariance by the market's sample variance, NaN when the variance is zero
#[inline]
pub(crate) fn beta_from<T: Float>(cov: T, var: T) -> T {
    if var.is_zero() { T::nan() } else { cov / var }
}

/// Returns the rolling beta of a stock's returns against the market's returns
///
/// Beta measures the sensitivity of one return series to a reference series:
///
/// - Quantifies systematic risk exposure to the market
/// - Provides hedge ratios for market neutral positions
/// - Tracks how that exposure drifts over time
///
/// For every index `i >= window` the beta is computed from the trailing
/// observations `[i - window, i)` only, so the value at `i` never depends on the
/// observation at `i` or later. Covariance and variance are sample estimates
/// (divisor `window - 1`). Note that [`compute_pearson`](crate::compute_pearson)
/// uses population moments instead; the two are kept apart on purpose so
/// results stay comparable with existing outputs.
///
/// Indices `0..window` hold NaN, as does every index whose window has zero
/// market variance. A window at least as long as the input yields NaN everywhere.
///
/// The zero variance test is exact. A flat market window is only recognised when
/// its mean is exactly representable, e.g. `[0.5, 0.5, 0.5]` or `[1.0, 1.0, 1.0]`.
/// For a value like `0.2` the rounded mean leaves deviations in the order of
/// `1e-17`, so the variance is tiny but not zero and the beta is a finite but
/// meaningless number. Callers with such data should screen flat windows themselves.
///
/// # Arguments
///
/// * `stock` - The stock's returns
/// * `market` - The market's returns, aligned with `stock`
/// * `window` - The number of trailing observations per estimate
///
/// # Returns
///
/// * `Vec<T>` - The beta series, same length as the input
///
/// # Panics
///
/// Panics if `window` is zero or if the series differ in length.
///
/// # Examples
///
/// ```
/// use ta_correlation::rolling_beta;
/// use assert_approx_eq::assert_approx_eq;
///
/// let stock: [f64; 7] = [0.015, 0.025, -0.010, 0.030, 0.005, -0.015, 0.020];
/// let market = [0.010, 0.015, -0.005, 0.020, 0.010, -0.010, 0.015];
/// let betas = rolling_beta(&stock, &market, 3);
///
/// assert!(betas[..3].iter().all(|b| b.is_nan()));
/// let expected: [f64; 4] = [1.731, 1.643, 1.553, 1.429];
/// for (e, b) in expected.iter().zip(&betas[3..]) {
///     assert_approx_eq!(e, b, 0.001);
/// }
/// ```
pub fn rolling_beta<T: Float + Default>(stock: &[T], market: &[T], window: usize) -> Vec<T> {
    assert!(window > 0, "window can not be zero");
    assert_eq!(
        stock.len(),
        market.len(),
        "paired series must have the same length"
    );

    let mut betas = vec![T::nan(); stock.len()];
    let mut degenerate = 0usize;

    for (i, beta) in betas.iter_mut().enumerate().skip(window) {
        let span = i - window..i;
        let [[_, cov], [_, var]] =
            covariance_matrix([&stock[span.clone()], &market[span]], 1);
        if var.is_zero() {
            degenerate += 1;
        }
        *beta = beta_from(cov, var);
    }

    if degenerate > 0 {
        tracing::debug!(window, degenerate, "market variance vanished in rolling windows");
    }

    betas
}

/// A streaming rolling beta estimator.
///
/// `RollingBeta<T>` keeps the trailing `period` (stock, market) return pairs and
/// computes the same sample covariance based beta as [`rolling_beta`]. After
/// feeding the pairs at indices `0..i`, [`beta`](Self::beta) returns exactly
/// `rolling_beta(...)[i]`, which makes it suitable for live updates where the
/// estimate for the next step must not include that step's return.
#[derive(Debug, Clone)]
pub struct RollingBeta<T> {
    /// Trailing stock returns
    stock: Window<T>,
    /// Trailing market returns, aligned with `stock`
    market: Window<T>,
}

impl<T> RollingBeta<T>
where
    T: Default + Float,
{
    /// Creates a new `RollingBeta` instance with the specified period.
    ///
    /// # Arguments
    ///
    /// * `period` - The number of trailing observations per estimate
    ///
    /// # Returns
    ///
    /// * `Self` - The estimator
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: usize) -> Self {
        Self {
            stock: Window::new(period),
            market: Window::new(period),
        }
    }

    /// Returns the period of the estimator
    pub const fn period(&self) -> usize {
        self.market.period()
    }

    /// Returns true once `period` pairs have been observed
    pub const fn is_ready(&self) -> bool {
        self.market.is_full()
    }

    /// Resets the estimator
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The estimator
    pub fn reset(&mut self) -> &mut Self {
        self.stock.reset();
        self.market.reset();
        self
    }

    /// Adds the next (stock, market) return pair
    ///
    /// # Arguments
    ///
    /// * `value` - A tuple of the stock and market returns at the same step
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The estimator for method chaining
    pub fn next(&mut self, (stock, market): (T, T)) -> &mut Self {
        self.stock.push(stock);
        self.market.push(market);
        self
    }

    /// Returns the beta over the pairs currently in the window
    ///
    /// # Returns
    ///
    /// * `Option<T>` - `None` until the window is full, `Some(NaN)` when the market
    ///   variance over the window is zero
    ///
    /// # Examples
    ///
    /// ```
    /// use ta_correlation::RollingBeta;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let mut beta = RollingBeta::new(3);
    /// let mut results = vec![];
    /// let inputs = [(0.015, 0.010), (0.025, 0.015), (-0.010, -0.005), (0.030, 0.020)];
    /// inputs.iter().for_each(|i| {
    ///     if let Some(b) = beta.next(*i).beta() {
    ///         results.push(b);
    ///     }
    /// });
    ///
    /// let expected: [f64; 2] = [1.731, 1.643];
    /// for (e, b) in expected.iter().zip(&results) {
    ///     assert_approx_eq!(e, b, 0.001);
    /// }
    /// ```
    pub fn beta(&self) -> Option<T> {
        if !self.is_ready() {
            return None;
        }

        let [[_, cov], [_, var]] =
            covariance_matrix([self.stock.as_slice(), self.market.as_slice()], 1);
        Some(beta_from(cov, var))
    }
}
