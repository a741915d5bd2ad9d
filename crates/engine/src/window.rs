//! Fixed-length sliding window of feature rows.

use std::collections::VecDeque;

use cropcast_core::types::FeatureVector;

use crate::error::EngineError;

/// Number of trailing time-steps fed to the model per prediction.
///
/// Every pretrained artifact set was fitted to this window length; it is
/// an invariant of the artifacts, not a tuning knob.
pub const WINDOW_SIZE: usize = 60;

/// A rolling context of exactly [`WINDOW_SIZE`] feature rows.
///
/// Strict FIFO: each `advance` drops the oldest row and appends the
/// newest, so the length never changes after construction. A buffer is
/// exclusively owned by one inference call and never shared across
/// requests.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    rows: VecDeque<FeatureVector>,
}

impl WindowBuffer {
    /// Build a window from exactly [`WINDOW_SIZE`] rows, oldest first.
    pub fn new(rows: Vec<FeatureVector>) -> Result<Self, EngineError> {
        if rows.len() != WINDOW_SIZE {
            return Err(EngineError::InvalidWindowSize {
                expected: WINDOW_SIZE,
                actual: rows.len(),
            });
        }
        Ok(Self { rows: rows.into() })
    }

    /// Drop the oldest row and append `row`.
    pub fn advance(&mut self, row: FeatureVector) {
        self.rows.pop_front();
        self.rows.push_back(row);
    }

    /// The current window, oldest to newest, as direct model input.
    pub fn snapshot(&self) -> Vec<FeatureVector> {
        self.rows.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: f64) -> FeatureVector {
        FeatureVector {
            max_temp: 30.0,
            min_temp: 18.0,
            rainfall: 0.0,
            price,
        }
    }

    fn full_window() -> WindowBuffer {
        WindowBuffer::new((0..WINDOW_SIZE).map(|i| row(i as f64)).collect()).unwrap()
    }

    #[test]
    fn test_new_requires_exact_size() {
        let short: Vec<_> = (0..WINDOW_SIZE - 1).map(|i| row(i as f64)).collect();
        match WindowBuffer::new(short) {
            Err(EngineError::InvalidWindowSize { expected, actual }) => {
                assert_eq!(expected, WINDOW_SIZE);
                assert_eq!(actual, WINDOW_SIZE - 1);
            }
            other => panic!("expected InvalidWindowSize, got {other:?}"),
        }

        let long: Vec<_> = (0..WINDOW_SIZE + 1).map(|i| row(i as f64)).collect();
        assert!(WindowBuffer::new(long).is_err());
    }

    #[test]
    fn test_advance_keeps_length_invariant() {
        let mut window = full_window();
        for i in 0..200 {
            window.advance(row(1000.0 + i as f64));
            assert_eq!(window.len(), WINDOW_SIZE);
        }
    }

    #[test]
    fn test_advance_is_strict_fifo() {
        let mut window = full_window();
        window.advance(row(999.0));

        let snap = window.snapshot();
        assert_eq!(snap.len(), WINDOW_SIZE);
        // Oldest row (price 0) dropped, everything shifted, newest appended.
        assert_eq!(snap[0].price, 1.0);
        assert_eq!(snap[WINDOW_SIZE - 2].price, (WINDOW_SIZE - 1) as f64);
        assert_eq!(snap[WINDOW_SIZE - 1].price, 999.0);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let window = full_window();
        let snap = window.snapshot();
        for (i, r) in snap.iter().enumerate() {
            assert_eq!(r.price, i as f64);
        }
    }
}
