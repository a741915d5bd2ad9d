//! Capability seams consumed by the forecasting engines.
//!
//! The engines never own a trained model or a fitted scaler; they drive
//! whatever implementations the caller supplies. Production implementations
//! live in `cropcast-ml`; tests substitute hand-rolled doubles. All calls
//! are synchronous — no async, no locks, no I/O inside an inference call.

use anyhow::Result;

use crate::types::FeatureVector;

/// A trained sequence model mapping fixed-length windows of normalized
/// feature rows to one normalized price each.
///
/// Implementations must accept both single-window and multi-window batches;
/// the output order matches the input order.
pub trait SequenceModel: Send + Sync {
    /// Predict one normalized price per window.
    fn predict(&self, windows: &[Vec<FeatureVector>]) -> Result<Vec<f64>>;
}

/// A fitted, invertible per-field normalization over 4-field rows.
///
/// `inverse_transform(transform(x))` must equal `x` up to floating-point
/// tolerance. Both directions operate field-wise, so a row with unused
/// fields zero-filled still recovers its populated fields exactly.
pub trait FeatureScaler: Send + Sync {
    /// Map raw rows into normalized space.
    fn transform(&self, rows: &[FeatureVector]) -> Result<Vec<FeatureVector>>;

    /// Map normalized rows back into raw space.
    fn inverse_transform(&self, rows: &[FeatureVector]) -> Result<Vec<FeatureVector>>;
}
