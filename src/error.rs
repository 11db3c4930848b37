use thiserror::Error;

/// Errors reported by the checked entry points on [`MetricsConfig`](crate::MetricsConfig).
///
/// The plain functions do not return this type: they treat misaligned input as a
/// contract violation and panic, while degenerate numeric input is signalled by
/// NaN or `0.0` in the result itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Series that must be aligned have different lengths
    #[error("series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the reference series
        expected: usize,
        /// Length of the offending series
        actual: usize,
    },

    /// The rolling window cannot produce a sample covariance
    #[error("window of {window} is too small, at least {min} observations are required")]
    WindowTooSmall {
        /// Requested window
        window: usize,
        /// Minimum accepted window
        min: usize,
    },
}
