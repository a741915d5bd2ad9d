//! Cropcast command-line front-end.
//!
//! Stands in for the service's HTTP layer: loads configuration and region
//! artifacts once, then dispatches a single forecast, backtest, or history
//! readout. Future weather days are read from a JSON file — fetching them
//! is the weather provider's concern, and the file is expected to cover
//! the days strictly after "today" through the target date inclusive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cropcast_core::config::AppConfig;
use cropcast_core::types::WeatherDay;
use cropcast_engine::metrics::accuracy;
use cropcast_engine::{ArtifactRegistry, RegionArtifacts};

/// Arecanut price forecasting from regional weather.
#[derive(Parser, Debug)]
#[command(name = "cropcast", about = "Arecanut price forecasting from weather")]
struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON logs instead of pretty logs.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast the price at the end of a weather horizon.
    Predict {
        /// Region to forecast.
        #[arg(short, long)]
        region: String,
        /// JSON file holding the future weather days, ordered by date.
        #[arg(short, long)]
        weather: PathBuf,
    },
    /// Replay the model over trailing history and report accuracy.
    Backtest {
        /// Region to evaluate.
        #[arg(short, long)]
        region: String,
        /// Number of trailing evaluation days.
        #[arg(short, long, default_value_t = 90)]
        days: usize,
        /// Write the actual/predicted series to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the most recent known price per region.
    LatestPrices,
    /// Print the trailing price series for a region.
    History {
        /// Region to read.
        #[arg(short, long)]
        region: String,
        /// Number of trailing days.
        #[arg(short, long, default_value_t = 30)]
        days: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    cropcast_core::logging::init_tracing(args.json_logs);

    let config = AppConfig::load(args.config)?;
    let registry = ArtifactRegistry::load(&config)?;

    tracing::info!(regions = ?registry.regions(), "registry ready");

    match args.command {
        Command::Predict { region, weather } => {
            let artifacts = lookup(&registry, &region)?;
            let data = std::fs::read_to_string(&weather)
                .with_context(|| format!("failed to read weather file {}", weather.display()))?;
            let days: Vec<WeatherDay> = serde_json::from_str(&data)
                .context("weather file must be a JSON array of weather days")?;

            let price = artifacts.forecast(&days)?;
            if let Some(target) = days.last() {
                println!("{region} {}: predicted price {price:.2}", target.date);
            }
        }
        Command::Backtest {
            region,
            days,
            output,
        } => {
            let artifacts = lookup(&registry, &region)?;
            let points = artifacts.backtest(days)?;
            let report = accuracy(&points);

            println!(
                "{region}: rmse {:.2}, mae {:.2}, mape {:.2}% over {} points",
                report.rmse, report.mae, report.mape_pct, report.points
            );
            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&points)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("series written to {}", path.display());
            }
        }
        Command::LatestPrices => {
            for latest in registry.latest_prices() {
                println!("{} {}: {:.2}", latest.region, latest.date, latest.price);
            }
        }
        Command::History { region, days } => {
            let artifacts = lookup(&registry, &region)?;
            for point in artifacts.price_history(days) {
                println!("{} {:.2}", point.date, point.price);
            }
        }
    }

    Ok(())
}

fn lookup<'a>(registry: &'a ArtifactRegistry, region: &str) -> Result<&'a RegionArtifacts> {
    registry.get(region).with_context(|| {
        format!(
            "no artifacts loaded for region '{region}' (available: {})",
            registry.regions().join(", ")
        )
    })
}
