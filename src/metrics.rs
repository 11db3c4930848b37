use alloc::vec::Vec;

use num_traits::Float;

use crate::{
    Error, compute_pearson,
    helper::covariance_matrix,
    pairwise::{PairMetrics, pairwise_metrics},
    rolling_beta::beta_from,
};

/// Correlation metrics of a pair of return series.
///
/// Every field is either a value or NaN when it is undefined for the input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsTriple<T> {
    /// Pearson correlation of the two return series
    pub pearson_correlation: T,
    /// Pearson correlation of the two rolling beta series over their jointly valid positions
    pub beta_correlation: T,
    /// Square of the Pearson correlation
    pub r_squared: T,
}

/// Returns the rolling betas of two stocks against the same market in one windowed pass
///
/// Each window is reduced to a single 3×3 sample covariance matrix of
/// (`returns_1`, `returns_2`, `market`), so both betas share one market variance.
/// The result is identical to calling [`rolling_beta`](crate::rolling_beta) once per stock.
///
/// # Arguments
///
/// * `returns_1` - The first stock's returns
/// * `returns_2` - The second stock's returns
/// * `market` - The market's returns
/// * `window` - The number of trailing observations per estimate
///
/// # Returns
///
/// * `(Vec<T>, Vec<T>)` - The beta series of each stock
///
/// # Panics
///
/// Panics if `window` is zero or if the series differ in length.
pub fn rolling_beta_pair<T: Float + Default>(
    returns_1: &[T],
    returns_2: &[T],
    market: &[T],
    window: usize,
) -> (Vec<T>, Vec<T>) {
    assert!(window > 0, "window can not be zero");
    assert_eq!(
        returns_1.len(),
        market.len(),
        "paired series must have the same length"
    );
    assert_eq!(
        returns_2.len(),
        market.len(),
        "paired series must have the same length"
    );

    let len = market.len();
    let mut betas_1 = vec![T::nan(); len];
    let mut betas_2 = vec![T::nan(); len];

    for i in window..len {
        let span = i - window..i;
        let cov = covariance_matrix(
            [
                &returns_1[span.clone()],
                &returns_2[span.clone()],
                &market[span],
            ],
            1,
        );
        let var = cov[2][2];
        betas_1[i] = beta_from(cov[0][2], var);
        betas_2[i] = beta_from(cov[1][2], var);
    }

    (betas_1, betas_2)
}

/// Returns the Pearson correlation between two beta series
///
/// Only positions from `window` onwards where both betas are defined (not NaN)
/// take part, so a window with a flat market drops out of both series at once.
///
/// # Arguments
///
/// * `betas_1` - The first beta series
/// * `betas_2` - The second beta series, aligned with `betas_1`
/// * `window` - The window the betas were computed with
///
/// # Returns
///
/// * `T` - The correlation, or NaN with fewer than two jointly valid positions
///
/// # Examples
///
/// ```
/// use ta_correlation::beta_correlation;
/// use assert_approx_eq::assert_approx_eq;
///
/// let nan = f64::NAN;
/// let b1 = [nan, nan, 1.0, 1.2, nan, 0.8];
/// let b2 = [nan, nan, 0.5, 0.7, 0.9, 0.3];
/// assert_approx_eq!(beta_correlation(&b1, &b2, 2), 1.0);
///
/// assert!(beta_correlation(&b1[..4], &b2[..4], 3).is_nan());
/// ```
pub fn beta_correlation<T: Float + Default>(betas_1: &[T], betas_2: &[T], window: usize) -> T {
    let (valid_1, valid_2): (Vec<T>, Vec<T>) = betas_1
        .iter()
        .zip(betas_2)
        .skip(window)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .unzip();

    if valid_1.len() > 1 {
        compute_pearson(&valid_1, &valid_2)
    } else {
        tracing::debug!(valid = valid_1.len(), "too few valid betas for a correlation");
        T::nan()
    }
}

/// Computes the correlation metrics of two stocks against a common market
///
/// The Pearson correlation and R² are taken over the full `returns_1` and
/// `returns_2`. Both rolling betas come from one shared windowed pass (see
/// [`rolling_beta_pair`]) and are then correlated with [`beta_correlation`].
///
/// The result equals computing each piece independently with
/// [`compute_pearson`], [`rolling_beta`](crate::rolling_beta) and
/// [`beta_correlation`]; the combined routine only avoids repeating the
/// market's windowed work.
///
/// # Arguments
///
/// * `returns_1` - The first stock's returns
/// * `returns_2` - The second stock's returns
/// * `market` - The market's returns
/// * `window` - The number of trailing observations per beta estimate
///
/// # Returns
///
/// * `MetricsTriple<T>` - Pearson correlation, beta correlation and R²
///
/// # Panics
///
/// Panics if `window` is zero or if the series differ in length. Use
/// [`MetricsConfig::compute`] for a checked variant.
///
/// # Examples
///
/// ```
/// use ta_correlation::compute_correlation_metrics;
/// use assert_approx_eq::assert_approx_eq;
///
/// let market: [f64; 8] = [0.010, -0.004, 0.007, 0.012, -0.009, 0.003, 0.006, -0.002];
/// let stock_1 = [0.014, -0.006, 0.011, 0.015, -0.012, 0.002, 0.009, -0.001];
/// let stock_2 = [0.007, -0.003, 0.004, 0.010, -0.006, 0.004, 0.003, -0.003];
///
/// let metrics = compute_correlation_metrics(&stock_1, &stock_2, &market, 3);
/// assert!(metrics.pearson_correlation > 0.9);
/// assert_approx_eq!(metrics.r_squared, metrics.pearson_correlation.powi(2));
/// assert!(!metrics.beta_correlation.is_nan());
/// ```
pub fn compute_correlation_metrics<T: Float + Default>(
    returns_1: &[T],
    returns_2: &[T],
    market: &[T],
    window: usize,
) -> MetricsTriple<T> {
    let pearson_correlation = compute_pearson(returns_1, returns_2);
    let (betas_1, betas_2) = rolling_beta_pair(returns_1, returns_2, market, window);

    MetricsTriple {
        pearson_correlation,
        beta_correlation: beta_correlation(&betas_1, &betas_2, window),
        r_squared: pearson_correlation * pearson_correlation,
    }
}

/// Validated settings for the correlation metrics.
///
/// The plain functions treat misaligned input as a programming error and panic.
/// `MetricsConfig` is the checked front door for callers that receive series
/// from elsewhere: it rejects windows that cannot produce a sample covariance
/// and reports length mismatches as [`Error`] values.
///
/// With the `serde` feature, deserialization goes through [`MetricsConfig::new`],
/// so a config read from a file is rejected if its window is too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawMetricsConfig")
)]
pub struct MetricsConfig {
    /// Rolling beta window
    window: usize,
}

/// Unchecked wire form of [`MetricsConfig`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMetricsConfig {
    window: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMetricsConfig> for MetricsConfig {
    type Error = Error;

    fn try_from(raw: RawMetricsConfig) -> Result<Self, Self::Error> {
        Self::new(raw.window)
    }
}

impl MetricsConfig {
    /// Smallest window with a defined sample variance
    pub const MIN_WINDOW: usize = 2;

    /// Creates a new `MetricsConfig` with the specified rolling window.
    ///
    /// # Arguments
    ///
    /// * `window` - The number of trailing observations per beta estimate
    ///
    /// # Returns
    ///
    /// * `Result<Self, Error>` - The config, or [`Error::WindowTooSmall`]
    pub const fn new(window: usize) -> Result<Self, Error> {
        if window < Self::MIN_WINDOW {
            return Err(Error::WindowTooSmall {
                window,
                min: Self::MIN_WINDOW,
            });
        }
        Ok(Self { window })
    }

    /// Returns the rolling window
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Re-checks the window, useful after deserializing a config
    pub const fn validate(&self) -> Result<(), Error> {
        match Self::new(self.window) {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Computes the correlation metrics after checking the series are aligned
    ///
    /// # Arguments
    ///
    /// * `returns_1` - The first stock's returns
    /// * `returns_2` - The second stock's returns
    /// * `market` - The market's returns
    ///
    /// # Returns
    ///
    /// * `Result<MetricsTriple<T>, Error>` - The metrics, or [`Error::LengthMismatch`]
    ///
    /// # Examples
    ///
    /// ```
    /// use ta_correlation::{Error, MetricsConfig};
    ///
    /// # fn main() -> Result<(), Error> {
    /// let config = MetricsConfig::new(3)?;
    /// let market = [0.010, -0.004, 0.007, 0.012, -0.009];
    /// let result = config.compute(&market[..4], &market, &market);
    /// assert_eq!(result, Err(Error::LengthMismatch { expected: 5, actual: 4 }));
    /// # Ok(())
    /// # }
    /// ```
    pub fn compute<T: Float + Default>(
        &self,
        returns_1: &[T],
        returns_2: &[T],
        market: &[T],
    ) -> Result<MetricsTriple<T>, Error> {
        self.validate()?;
        check_aligned(market.len(), [returns_1, returns_2])?;
        Ok(compute_correlation_metrics(
            returns_1,
            returns_2,
            market,
            self.window,
        ))
    }

    /// Computes the metrics of every pair of series after checking alignment
    ///
    /// See [`pairwise_metrics`](crate::pairwise_metrics).
    pub fn compute_pairwise<T, S>(
        &self,
        series: &[S],
        market: &[T],
    ) -> Result<Vec<PairMetrics<T>>, Error>
    where
        T: Float + Default,
        S: AsRef<[T]>,
    {
        self.validate()?;
        check_aligned(market.len(), series.iter().map(AsRef::<[T]>::as_ref))?;
        Ok(pairwise_metrics(series, market, self.window))
    }
}

fn check_aligned<'a, T: 'a>(
    expected: usize,
    series: impl IntoIterator<Item = &'a [T]>,
) -> Result<(), Error> {
    match series.into_iter().find(|s| s.len() != expected) {
        Some(s) => Err(Error::LengthMismatch {
            expected,
            actual: s.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::rolling_beta;

    const MARKET: [f64; 12] = [
        0.010, -0.004, 0.007, 0.012, -0.009, 0.003, 0.006, -0.002, 0.008, -0.011, 0.004, 0.005,
    ];
    const STOCK_1: [f64; 12] = [
        0.014, -0.006, 0.011, 0.015, -0.012, 0.002, 0.009, -0.001, 0.013, -0.016, 0.007, 0.004,
    ];
    const STOCK_2: [f64; 12] = [
        0.007, -0.003, 0.004, 0.010, -0.006, 0.004, 0.003, -0.003, 0.002, -0.008, 0.001, 0.006,
    ];

    fn same(a: f64, b: f64) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    #[test]
    fn known_values() {
        let m = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, 4);
        assert_approx_eq!(m.pearson_correlation, 0.891370, 0.0001);
        assert_approx_eq!(m.beta_correlation, -0.782505, 0.0001);
        assert_approx_eq!(m.r_squared, 0.794540, 0.0001);
    }

    #[test]
    fn matches_independent_computation() {
        for window in 2..8 {
            let combined = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, window);

            let pearson = compute_pearson(&STOCK_1, &STOCK_2);
            let b1 = rolling_beta(&STOCK_1, &MARKET, window);
            let b2 = rolling_beta(&STOCK_2, &MARKET, window);
            let beta_corr = beta_correlation(&b1, &b2, window);

            assert!(same(combined.pearson_correlation, pearson));
            assert!(same(combined.beta_correlation, beta_corr));
            assert_approx_eq!(combined.r_squared, pearson * pearson);
        }
    }

    #[test]
    fn pair_pass_matches_single_passes() {
        let (b1, b2) = rolling_beta_pair(&STOCK_1, &STOCK_2, &MARKET, 5);
        let s1 = rolling_beta(&STOCK_1, &MARKET, 5);
        let s2 = rolling_beta(&STOCK_2, &MARKET, 5);
        assert!(b1.iter().zip(&s1).all(|(a, b)| same(*a, *b)));
        assert!(b2.iter().zip(&s2).all(|(a, b)| same(*a, *b)));
    }

    #[test]
    fn flat_market_windows_are_masked() {
        let market = [0.25, 0.25, 0.25, 0.01, -0.02, 0.03, 0.01, -0.01];
        let r1 = [0.01, 0.03, -0.02, 0.02, 0.01, 0.04, -0.01, 0.02];
        let r2 = [0.02, -0.01, 0.01, 0.03, -0.02, 0.02, 0.01, 0.00];
        let (b1, b2) = rolling_beta_pair(&r1, &r2, &market, 3);
        assert!(b1[3].is_nan() && b2[3].is_nan());
        assert!(b1[4..].iter().all(|b| !b.is_nan()));

        let m = compute_correlation_metrics(&r1, &r2, &market, 3);
        let valid_1: Vec<f64> = b1[4..].to_vec();
        let valid_2: Vec<f64> = b2[4..].to_vec();
        assert!(same(m.beta_correlation, compute_pearson(&valid_1, &valid_2)));
        assert_approx_eq!(m.beta_correlation, 0.977994, 0.0001);
    }

    #[test]
    fn too_few_valid_betas_is_nan() {
        // a single window
        let m = compute_correlation_metrics(&STOCK_1[..5], &STOCK_2[..5], &MARKET[..5], 4);
        assert!(m.beta_correlation.is_nan());
        assert!(!m.pearson_correlation.is_nan());

        // no window at all
        let m = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, 12);
        assert!(m.beta_correlation.is_nan());
    }

    #[test]
    fn constant_returns_floor_pearson() {
        let flat = [0.01; 12];
        let m = compute_correlation_metrics(&flat, &STOCK_2, &MARKET, 4);
        assert_eq!(m.pearson_correlation, 0.0);
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn deterministic() {
        let a = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, 4);
        let b = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, 4);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "paired series must have the same length")]
    fn length_mismatch_panics() {
        let _ = compute_correlation_metrics(&STOCK_1, &STOCK_2[..11], &MARKET, 4);
    }

    #[test]
    fn config_rejects_small_window() {
        assert_eq!(
            MetricsConfig::new(1),
            Err(Error::WindowTooSmall { window: 1, min: 2 })
        );
        assert!(MetricsConfig::new(0).is_err());
    }

    #[test]
    fn config_compute_matches_plain_function() -> Result<(), Error> {
        let config = MetricsConfig::new(4)?;
        assert_eq!(config.window(), 4);
        let checked = config.compute(&STOCK_1, &STOCK_2, &MARKET)?;
        let plain = compute_correlation_metrics(&STOCK_1, &STOCK_2, &MARKET, 4);
        assert_eq!(checked, plain);
        Ok(())
    }

    #[test]
    fn config_reports_length_mismatch() -> Result<(), Error> {
        let config = MetricsConfig::new(4)?;
        assert_eq!(
            config.compute(&STOCK_1, &STOCK_2[..10], &MARKET),
            Err(Error::LengthMismatch {
                expected: 12,
                actual: 10
            })
        );
        Ok(())
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trips() -> Result<(), serde_json::Error> {
        let config = MetricsConfig::new(20)
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        let json = serde_json::to_string(&config)?;
        assert_eq!(json, r#"{"window":20}"#);
        assert_eq!(serde_json::from_str::<MetricsConfig>(&json)?, config);
        Ok(())
    }

    #[test]
    fn config_rejects_small_window_on_load() {
        for json in [r#"{"window":0}"#, r#"{"window":1}"#] {
            let err = serde_json::from_str::<MetricsConfig>(json);
            assert!(err.is_err(), "{json} was accepted");
        }
        assert!(serde_json::from_str::<MetricsConfig>(r#"{"window":0}"#)
            .is_err_and(|e| e.to_string().contains("window of 0 is too small")));
    }

    #[test]
    fn triple_round_trips() -> Result<(), serde_json::Error> {
        let triple = MetricsTriple {
            pearson_correlation: 0.75,
            beta_correlation: -0.25,
            r_squared: 0.5625,
        };
        let json = serde_json::to_string(&triple)?;
        assert_eq!(serde_json::from_str::<MetricsTriple<f64>>(&json)?, triple);
        Ok(())
    }
}
