//! Core types for the cropcast forecasting platform.
//!
//! Everything here is a plain value type: rows are `Copy`, dates are
//! `chrono::NaiveDate`, and nothing holds interior state. The engines own
//! all per-call mutable state themselves.

pub mod feature;
pub mod record;

// Re-export primary types for convenient access via `cropcast_core::types::*`.
pub use feature::FeatureVector;
pub use record::{BacktestPoint, DailyRecord, LatestPrice, PricePoint, WeatherDay};
