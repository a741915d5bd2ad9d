//! Error taxonomy for the forecasting and backtesting engines.
//!
//! Every variant is recoverable by the caller. The engines catch all
//! scaler and model failures internally and surface them here; no foreign
//! error type and no panic crosses the public operations. There is no
//! retry logic at this layer — retries, if any, belong to the caller.

/// Errors produced by the public engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A window was constructed with the wrong number of rows.
    #[error("window must contain exactly {expected} rows, got {actual}")]
    InvalidWindowSize { expected: usize, actual: usize },

    /// Not enough historical rows for the requested operation.
    #[error("insufficient history: need {required} rows, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// A forecast was requested over zero future days.
    #[error("forecast horizon is empty")]
    EmptyForecastHorizon,

    /// The scaler failed to transform or inverse-transform rows.
    #[error("scaling failed: {0}")]
    Scaling(String),

    /// The model failed to produce predictions.
    #[error("model inference failed: {0}")]
    ModelInference(String),
}
