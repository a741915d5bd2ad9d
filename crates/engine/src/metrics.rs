//! Accuracy measures over paired actual/predicted series.

use serde::Serialize;

use cropcast_core::types::BacktestPoint;

/// Aggregate error measures for one backtest run.
#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Mean absolute percentage error, in percent. Points with a zero
    /// actual price are skipped.
    pub mape_pct: f64,
    /// Number of points evaluated.
    pub points: usize,
}

/// Compute accuracy measures over backtest points.
///
/// An empty series yields a report of zeros.
pub fn accuracy(points: &[BacktestPoint]) -> AccuracyReport {
    if points.is_empty() {
        return AccuracyReport {
            rmse: 0.0,
            mae: 0.0,
            mape_pct: 0.0,
            points: 0,
        };
    }

    let n = points.len() as f64;
    let mut squared_sum = 0.0;
    let mut abs_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;

    for point in points {
        let err = point.predicted - point.actual;
        squared_sum += err * err;
        abs_sum += err.abs();
        if point.actual.abs() > f64::EPSILON {
            pct_sum += (err / point.actual).abs();
            pct_count += 1;
        }
    }

    AccuracyReport {
        rmse: (squared_sum / n).sqrt(),
        mae: abs_sum / n,
        mape_pct: if pct_count > 0 {
            pct_sum / pct_count as f64 * 100.0
        } else {
            0.0
        },
        points: points.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u64, actual: f64, predicted: f64) -> BacktestPoint {
        BacktestPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(day),
            actual,
            predicted,
        }
    }

    #[test]
    fn test_empty_series() {
        let report = accuracy(&[]);
        assert_eq!(report.points, 0);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.mape_pct, 0.0);
    }

    #[test]
    fn test_perfect_predictions() {
        let points = vec![point(0, 100.0, 100.0), point(1, 200.0, 200.0)];
        let report = accuracy(&points);
        assert_eq!(report.points, 2);
        assert!(report.rmse.abs() < 1e-12);
        assert!(report.mae.abs() < 1e-12);
        assert!(report.mape_pct.abs() < 1e-12);
    }

    #[test]
    fn test_known_errors() {
        // Errors of +10 and -10 on actuals of 100 and 200.
        let points = vec![point(0, 100.0, 110.0), point(1, 200.0, 190.0)];
        let report = accuracy(&points);
        assert!((report.rmse - 10.0).abs() < 1e-12);
        assert!((report.mae - 10.0).abs() < 1e-12);
        // (10% + 5%) / 2
        assert!((report.mape_pct - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_actual_skipped_in_mape() {
        let points = vec![point(0, 0.0, 10.0), point(1, 100.0, 110.0)];
        let report = accuracy(&points);
        assert!((report.mape_pct - 10.0).abs() < 1e-12);
    }
}
