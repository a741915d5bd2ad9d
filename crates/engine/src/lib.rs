//! # cropcast-engine
//!
//! The windowed autoregressive inference and backtesting engine: the part
//! of the platform with real numerical content. [`ForecastEngine`] turns a
//! fixed-length historical window plus future exogenous weather into a
//! multi-step price forecast; [`BacktestEngine`] replays the model against
//! known history to produce paired actual/predicted series.
//!
//! Both engines consume a trained [`SequenceModel`] and a fitted
//! [`FeatureScaler`] as read-only capabilities — they never train, fetch,
//! or mutate artifacts. [`ArtifactRegistry`] owns those artifacts per
//! region with a load-once lifecycle.
//!
//! [`SequenceModel`]: cropcast_core::traits::SequenceModel
//! [`FeatureScaler`]: cropcast_core::traits::FeatureScaler

pub mod backtest;
pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod registry;
pub mod window;

pub use backtest::BacktestEngine;
pub use error::EngineError;
pub use forecast::ForecastEngine;
pub use registry::{ArtifactRegistry, RegionArtifacts};
pub use window::{WindowBuffer, WINDOW_SIZE};
