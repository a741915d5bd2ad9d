//! Historical replay: one-step-ahead predictions against known history.
//!
//! Unlike the autoregressive rollout, every window here is built from real
//! history — predictions never feed back into the input — so all windows
//! exist up front and the model runs once over the whole batch.

use cropcast_core::traits::{FeatureScaler, SequenceModel};
use cropcast_core::types::{BacktestPoint, DailyRecord, FeatureVector};

use crate::error::EngineError;
use crate::window::WINDOW_SIZE;

/// Replays the model over trailing history, pairing each ground-truth
/// price with the model's one-step-ahead prediction for the same date.
pub struct BacktestEngine<'a> {
    model: &'a dyn SequenceModel,
    scaler: &'a dyn FeatureScaler,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(model: &'a dyn SequenceModel, scaler: &'a dyn FeatureScaler) -> Self {
        Self { model, scaler }
    }

    /// Evaluate the trailing `span_days` of `history`.
    ///
    /// Requires `span_days + WINDOW_SIZE` rows: the first [`WINDOW_SIZE`]
    /// rows of the slice are context only and never appear as output
    /// points. Returns one [`BacktestPoint`] per evaluation day, ordered
    /// by date ascending. `span_days == 0` yields an empty series, not an
    /// error.
    pub fn backtest(
        &self,
        history: &[DailyRecord],
        span_days: usize,
    ) -> Result<Vec<BacktestPoint>, EngineError> {
        if span_days == 0 {
            return Ok(Vec::new());
        }

        let required = span_days + WINDOW_SIZE;
        if history.len() < required {
            return Err(EngineError::InsufficientHistory {
                required,
                available: history.len(),
            });
        }

        tracing::debug!(span_days, "starting backtest replay");

        let slice = &history[history.len() - required..];
        let rows: Vec<FeatureVector> = slice.iter().map(|r| r.features).collect();
        let scaled = self
            .scaler
            .transform(&rows)
            .map_err(|e| EngineError::Scaling(e.to_string()))?;
        if scaled.len() != rows.len() {
            return Err(EngineError::Scaling(format!(
                "scaler returned {} rows for {} inputs",
                scaled.len(),
                rows.len()
            )));
        }

        // One window per evaluation step, each ending just before the row
        // whose price is the ground truth for that step.
        let mut windows = Vec::with_capacity(span_days);
        let mut truths_scaled = Vec::with_capacity(span_days);
        for i in WINDOW_SIZE..scaled.len() {
            windows.push(scaled[i - WINDOW_SIZE..i].to_vec());
            truths_scaled.push(scaled[i].price);
        }

        let preds_scaled = self
            .model
            .predict(&windows)
            .map_err(|e| EngineError::ModelInference(e.to_string()))?;
        if preds_scaled.len() != windows.len() {
            return Err(EngineError::ModelInference(format!(
                "model returned {} predictions for {} windows",
                preds_scaled.len(),
                windows.len()
            )));
        }

        let actual = self.recover_prices(&truths_scaled)?;
        let predicted = self.recover_prices(&preds_scaled)?;

        Ok(slice[WINDOW_SIZE..]
            .iter()
            .zip(actual)
            .zip(predicted)
            .map(|((record, actual), predicted)| BacktestPoint {
                date: record.date,
                actual,
                predicted,
            })
            .collect())
    }

    /// Inverse-transform a column of scaled prices through zero-filled
    /// dummy rows. The inverse is affine per-field, so the zero filling
    /// cannot corrupt the recovered price.
    fn recover_prices(&self, scaled: &[f64]) -> Result<Vec<f64>, EngineError> {
        let dummies: Vec<FeatureVector> = scaled
            .iter()
            .map(|&p| FeatureVector::from_array([0.0, 0.0, 0.0, p]))
            .collect();
        let rows = self
            .scaler
            .inverse_transform(&dummies)
            .map_err(|e| EngineError::Scaling(e.to_string()))?;
        if rows.len() != dummies.len() {
            return Err(EngineError::Scaling(format!(
                "scaler returned {} rows for {} inputs",
                rows.len(),
                dummies.len()
            )));
        }
        Ok(rows.iter().map(|r| r.price).collect())
    }
}
