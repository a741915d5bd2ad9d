//! Load-once registry of per-region artifacts.
//!
//! Reconstructs the service's "load everything at startup, serve many"
//! lifecycle as an explicit immutable object: one trained model, fitted
//! scaler, and history table per region. There is no reload or teardown
//! path — replacing artifacts means restarting the process.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::Device;

use cropcast_core::config::AppConfig;
use cropcast_core::traits::{FeatureScaler, SequenceModel};
use cropcast_core::types::{BacktestPoint, DailyRecord, LatestPrice, PricePoint, WeatherDay};
use cropcast_ml::{MinMaxScaler, PriceLstm};

use crate::backtest::BacktestEngine;
use crate::data::load_history;
use crate::error::EngineError;
use crate::forecast::ForecastEngine;

/// One region's long-lived artifacts.
///
/// Read-only after load: the engines borrow the model and scaler and never
/// mutate them, so concurrent calls against the same region may share one
/// instance without locking.
pub struct RegionArtifacts {
    model: Box<dyn SequenceModel>,
    scaler: Box<dyn FeatureScaler>,
    history: Vec<DailyRecord>,
}

impl RegionArtifacts {
    pub fn new(
        model: Box<dyn SequenceModel>,
        scaler: Box<dyn FeatureScaler>,
        history: Vec<DailyRecord>,
    ) -> Self {
        Self {
            model,
            scaler,
            history,
        }
    }

    /// Load one region's artifact triple from disk.
    fn load(
        region: &str,
        models_dir: &Path,
        data_dir: &Path,
        device: &Device,
    ) -> Result<Self> {
        let model_path = models_dir.join(format!("{region}_lstm.safetensors"));
        let model = PriceLstm::load(&model_path, device)
            .with_context(|| format!("loading model weights {}", model_path.display()))?;

        let scaler_path = models_dir.join(format!("{region}_scaler.json"));
        let scaler = MinMaxScaler::load(&scaler_path)
            .with_context(|| format!("loading scaler stats {}", scaler_path.display()))?;

        let history = load_history(&data_dir.join(format!("{region}_merged.csv")))?;

        Ok(Self::new(Box::new(model), Box::new(scaler), history))
    }

    /// Forecast the price for the last of `future_days`.
    pub fn forecast(&self, future_days: &[WeatherDay]) -> Result<f64, EngineError> {
        ForecastEngine::new(self.model.as_ref(), self.scaler.as_ref())
            .forecast(&self.history, future_days)
    }

    /// Replay the model over the trailing `span_days` of history.
    pub fn backtest(&self, span_days: usize) -> Result<Vec<BacktestPoint>, EngineError> {
        BacktestEngine::new(self.model.as_ref(), self.scaler.as_ref())
            .backtest(&self.history, span_days)
    }

    /// The most recent known price.
    pub fn latest_price(&self) -> Option<PricePoint> {
        self.history.last().map(|r| PricePoint {
            date: r.date,
            price: r.features.price,
        })
    }

    /// The trailing `days` of the price series.
    pub fn price_history(&self, days: usize) -> Vec<PricePoint> {
        let start = self.history.len().saturating_sub(days);
        self.history[start..]
            .iter()
            .map(|r| PricePoint {
                date: r.date,
                price: r.features.price,
            })
            .collect()
    }

    pub fn history(&self) -> &[DailyRecord] {
        &self.history
    }
}

/// Immutable registry of per-region artifacts, loaded once at startup.
pub struct ArtifactRegistry {
    regions: HashMap<String, RegionArtifacts>,
}

impl ArtifactRegistry {
    /// Load artifacts for every configured region.
    ///
    /// A region whose artifacts fail to load is skipped with an error log,
    /// so one corrupt region cannot take down the others. Fails only if no
    /// region loads at all.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let device = Device::Cpu;
        let mut regions = HashMap::new();

        for region in &config.forecast.regions {
            match RegionArtifacts::load(
                region,
                &config.artifacts.models_dir,
                &config.artifacts.data_dir,
                &device,
            ) {
                Ok(artifacts) => {
                    tracing::info!(
                        region = %region,
                        rows = artifacts.history.len(),
                        "loaded region artifacts"
                    );
                    regions.insert(region.clone(), artifacts);
                }
                Err(e) => {
                    tracing::error!(
                        region = %region,
                        error = %e,
                        "failed to load region artifacts, skipping"
                    );
                }
            }
        }

        anyhow::ensure!(!regions.is_empty(), "no region artifacts could be loaded");
        Ok(Self { regions })
    }

    /// Build a registry from pre-constructed artifacts (for testing and
    /// embedding).
    pub fn from_regions(regions: HashMap<String, RegionArtifacts>) -> Self {
        Self { regions }
    }

    pub fn get(&self, region: &str) -> Option<&RegionArtifacts> {
        self.regions.get(region)
    }

    /// Region names with loaded artifacts, sorted.
    pub fn regions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Most recent known price per region, sorted by region name.
    pub fn latest_prices(&self) -> Vec<LatestPrice> {
        let mut out: Vec<LatestPrice> = self
            .regions
            .iter()
            .filter_map(|(name, artifacts)| {
                artifacts.latest_price().map(|p| LatestPrice {
                    region: name.clone(),
                    date: p.date,
                    price: p.price,
                })
            })
            .collect();
        out.sort_by(|a, b| a.region.cmp(&b.region));
        out
    }
}
