use alloc::boxed::Box;

/// A trailing window over a series that is always readable as one ordered slice.
///
/// Every value is written twice, at `pos` and `pos + period`, into a buffer of
/// `2 * period` slots. The live window is then the contiguous range starting at
/// the oldest value, so [`as_slice`](Self::as_slice) hands out the observations
/// oldest first without copying or rotating.
#[derive(Debug, Clone)]
pub struct Window<T> {
    /// Mirrored storage, `2 * period` slots
    buf: Box<[T]>,
    /// Maximum number of observations kept
    period: usize,
    /// Slot the next value is written to, which holds the oldest value once full
    pos: usize,
    /// Number of observations currently held
    len: usize,
}

impl<T: Default + Copy> Window<T> {
    /// Creates a new window with the specified period, panics if period is 0
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period can not be zero");

        Self {
            buf: vec![T::default(); 2 * period].into_boxed_slice(),
            period,
            pos: 0,
            len: 0,
        }
    }

    /// Empties the window
    pub fn reset(&mut self) {
        self.pos = 0;
        self.len = 0;
    }

    /// Returns `true` once `period` observations have been pushed
    pub const fn is_full(&self) -> bool {
        self.len == self.period
    }

    /// Returns the number of observations held
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the period of the window
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Appends an observation, dropping the oldest one when full
    pub fn push(&mut self, value: T) {
        self.buf[self.pos] = value;
        self.buf[self.pos + self.period] = value;
        self.pos = (self.pos + 1) % self.period;
        self.len = (self.len + 1).min(self.period);
    }

    /// Returns the held observations, oldest first
    pub fn as_slice(&self) -> &[T] {
        let start = if self.is_full() { self.pos } else { 0 };
        &self.buf[start..start + self.len]
    }
}
