//! # cropcast-ml
//!
//! Concrete model and scaler implementations behind the capability traits
//! in [`cropcast_core::traits`]: a candle LSTM price predictor loaded from
//! safetensors weights, and a min-max feature scaler loaded from a JSON
//! stats sidecar. Both are trained offline by a companion pipeline; this
//! crate only performs inference.

pub mod model;
pub mod scaler;

pub use model::PriceLstm;
pub use scaler::MinMaxScaler;
