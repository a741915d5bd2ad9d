//! Loading of merged weather/price history files.
//!
//! One CSV per region with columns `Date,Max_Temp,Min_Temp,Rainfall,Price`,
//! ordered by date ascending, cleaned and gap-free upstream. The loader
//! validates the ordering once so the engines can trust it without
//! re-sorting.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use cropcast_core::types::{DailyRecord, FeatureVector};

/// One CSV row with the upstream pipeline's column headers.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Max_Temp")]
    max_temp: f64,
    #[serde(rename = "Min_Temp")]
    min_temp: f64,
    #[serde(rename = "Rainfall")]
    rainfall: f64,
    #[serde(rename = "Price")]
    price: f64,
}

/// Load a region's history table from a CSV file.
pub fn load_history(path: &Path) -> Result<Vec<DailyRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open history file {}", path.display()))?;

    let mut records: Vec<DailyRecord> = Vec::new();
    for row in reader.deserialize() {
        let raw: RawRecord =
            row.with_context(|| format!("malformed row in {}", path.display()))?;
        if let Some(prev) = records.last() {
            anyhow::ensure!(
                raw.date > prev.date,
                "history {} is not ordered by date: {} follows {}",
                path.display(),
                raw.date,
                prev.date
            );
        }
        records.push(DailyRecord {
            date: raw.date,
            features: FeatureVector {
                max_temp: raw.max_temp,
                min_temp: raw.min_temp,
                rainfall: raw.rainfall,
                price: raw.price,
            },
        });
    }

    anyhow::ensure!(!records.is_empty(), "history {} contains no rows", path.display());
    Ok(records)
}
