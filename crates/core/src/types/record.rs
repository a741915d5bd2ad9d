//! Dated domain records: history rows, exogenous weather days, and the
//! actual/predicted pairs produced by a backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::feature::FeatureVector;

/// One row of a region's historical table: a dated feature vector.
///
/// History tables are ordered by date ascending, cleaned, and gap-free;
/// the engines trust that ordering and never re-sort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub features: FeatureVector,
}

/// Exogenous weather forecast for one future day.
///
/// The price for that day is unknown by definition — it is what the model
/// is being asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub rainfall: f64,
}

impl WeatherDay {
    /// Feature row for this day with the price slot zero-filled.
    ///
    /// The zero is a placeholder only: the scaler requires fixed 4-field
    /// rows, and the slot is overwritten with the model's own normalized
    /// prediction before the row enters the window.
    pub fn placeholder_row(&self) -> FeatureVector {
        FeatureVector {
            max_temp: self.max_temp,
            min_temp: self.min_temp,
            rainfall: self.rainfall,
            price: 0.0,
        }
    }
}

/// One evaluation step of a backtest: the true price and the model's
/// one-step-ahead prediction for the same date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// A dated price without the weather fields, for history readouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A region's most recent known price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestPrice {
    pub region: String,
    pub date: NaiveDate,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_row_zero_fills_price() {
        let day = WeatherDay {
            date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            max_temp: 30.0,
            min_temp: 19.0,
            rainfall: 12.5,
        };
        let row = day.placeholder_row();
        assert_eq!(row.max_temp, 30.0);
        assert_eq!(row.min_temp, 19.0);
        assert_eq!(row.rainfall, 12.5);
        assert_eq!(row.price, 0.0);
    }
}
