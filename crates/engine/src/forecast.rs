//! Multi-step autoregressive price rollout.
//!
//! One model invocation per future day; each step's normalized prediction
//! is written into the row that advances the window for the next step.
//! The rollout is strictly sequential — step *i+1* consumes step *i*'s
//! output — so it cannot be parallelized across days.

use cropcast_core::traits::{FeatureScaler, SequenceModel};
use cropcast_core::types::{DailyRecord, FeatureVector, WeatherDay};

use crate::error::EngineError;
use crate::window::{WindowBuffer, WINDOW_SIZE};

/// Drives the autoregressive rollout over a borrowed model and scaler.
///
/// The borrows are read-only and shareable across concurrent calls; the
/// only mutable state is the per-call [`WindowBuffer`].
pub struct ForecastEngine<'a> {
    model: &'a dyn SequenceModel,
    scaler: &'a dyn FeatureScaler,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(model: &'a dyn SequenceModel, scaler: &'a dyn FeatureScaler) -> Self {
        Self { model, scaler }
    }

    /// Forecast the price for the last day of `future_days`.
    ///
    /// `history` must hold at least [`WINDOW_SIZE`] rows in chronological
    /// order; only the most recent [`WINDOW_SIZE`] are used. `future_days`
    /// is a non-empty chronologically ordered sequence, one entry per day
    /// strictly after "today" through the target date inclusive — that
    /// boundary is owned by whoever supplies the weather and is not
    /// enforced here.
    pub fn forecast(
        &self,
        history: &[DailyRecord],
        future_days: &[WeatherDay],
    ) -> Result<f64, EngineError> {
        if future_days.is_empty() {
            return Err(EngineError::EmptyForecastHorizon);
        }
        if history.len() < WINDOW_SIZE {
            return Err(EngineError::InsufficientHistory {
                required: WINDOW_SIZE,
                available: history.len(),
            });
        }

        tracing::debug!(horizon = future_days.len(), "starting autoregressive rollout");

        let tail: Vec<FeatureVector> = history[history.len() - WINDOW_SIZE..]
            .iter()
            .map(|r| r.features)
            .collect();
        let scaled = self
            .scaler
            .transform(&tail)
            .map_err(|e| EngineError::Scaling(e.to_string()))?;
        let mut window = WindowBuffer::new(scaled)?;

        let mut scaled_prediction = 0.0;
        for day in future_days {
            scaled_prediction = self.predict_one(&window)?;

            // Placeholder step: normalize the day's weather with a
            // zero-filled price slot, then overwrite that slot with the
            // prediction, which already lives in scaler space.
            let mut scaled_row = self.transform_one(day.placeholder_row())?;
            scaled_row.price = scaled_prediction;

            window.advance(scaled_row);
        }

        // De-normalize through a dummy row; only the price slot carries data.
        let dummy = FeatureVector::from_array([0.0, 0.0, 0.0, scaled_prediction]);
        let rows = self
            .scaler
            .inverse_transform(&[dummy])
            .map_err(|e| EngineError::Scaling(e.to_string()))?;
        let unscaled = rows
            .first()
            .ok_or_else(|| EngineError::Scaling("scaler returned no rows".into()))?;
        Ok(unscaled.price)
    }

    /// One model step over the current window snapshot.
    fn predict_one(&self, window: &WindowBuffer) -> Result<f64, EngineError> {
        let batch = [window.snapshot()];
        let preds = self
            .model
            .predict(&batch)
            .map_err(|e| EngineError::ModelInference(e.to_string()))?;
        preds.first().copied().ok_or_else(|| {
            EngineError::ModelInference("model returned no prediction for window".into())
        })
    }

    fn transform_one(&self, row: FeatureVector) -> Result<FeatureVector, EngineError> {
        let rows = self
            .scaler
            .transform(&[row])
            .map_err(|e| EngineError::Scaling(e.to_string()))?;
        rows.first()
            .copied()
            .ok_or_else(|| EngineError::Scaling("scaler returned no rows".into()))
    }
}
