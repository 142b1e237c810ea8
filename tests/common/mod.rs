//! Shared test fixtures for the GDP forecast integration tests.
//!
//! Provides a small covariate table, a matching model artifact written to a
//! temp directory, and `LinearForecaster`, a fake model whose output is easy
//! to compute by hand.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use gdp_forecast::{
    CovariateTable, ForecastContext, ForecastRow, Forecaster, FutureCovariateRow, Result,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Quarterly rows for 2025-2028 and 2030 (2029 deliberately absent).
pub const SAMPLE_CSV: &str = "\
ds,cpi,unemployment_rate
2025-01-01,117.0,2.0
2025-04-01,117.5,2.1
2025-07-01,118.0,2.0
2025-10-01,118.5,1.9
2026-01-01,119.0,2.0
2026-04-01,119.5,2.1
2026-07-01,120.0,2.0
2026-10-01,120.5,1.9
2027-01-01,121.0,2.0
2027-04-01,121.5,2.1
2027-07-01,122.0,2.0
2027-10-01,122.5,1.9
2028-01-01,123.0,2.0
2028-04-01,123.5,2.1
2028-07-01,124.0,2.0
2028-10-01,124.5,1.9
2030-01-01,127.0,2.0
2030-04-01,127.5,2.1
2030-07-01,128.0,2.0
2030-10-01,128.5,1.9
";

pub fn sample_table() -> CovariateTable {
    CovariateTable::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
}

/// A model artifact using the `cpi` and `unemployment_rate` columns.
pub fn sample_model_json() -> serde_json::Value {
    serde_json::json!({
        "start": "2000-01-01",
        "t_scale_days": 9040.0,
        "y_scale": 200000.0,
        "history_end": "2024-10-01",
        "trend": {
            "k": 0.55,
            "m": 0.178,
            "changepoints": [0.4, 0.8],
            "deltas": [0.2, 0.11]
        },
        "seasonalities": [
            {"name": "yearly", "period_days": 365.25, "coefficients": [0.004, -0.006]}
        ],
        "regressors": [
            {"name": "cpi", "mu": 105.0, "std": 6.0, "coefficient": 0.012},
            {"name": "unemployment_rate", "mu": 2.5, "std": 0.6, "coefficient": -0.008}
        ],
        "interval_width": 0.8,
        "sigma_obs": 0.012,
        "trend_sigma": 0.02
    })
}

/// Write the sample CSV and model artifact into a fresh temp directory.
///
/// Returns `(model_path, covariates_path, TempDir)`. Keep the `TempDir`
/// alive for as long as the paths are used.
pub fn write_sample_artifacts() -> (PathBuf, PathBuf, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();

    let model_path = tmp_dir.path().join("model.json");
    let mut f = std::fs::File::create(&model_path).unwrap();
    f.write_all(serde_json::to_string_pretty(&sample_model_json()).unwrap().as_bytes())
        .unwrap();

    let csv_path = tmp_dir.path().join("FutureValues.csv");
    std::fs::write(&csv_path, SAMPLE_CSV).unwrap();

    (model_path, csv_path, tmp_dir)
}

// ---------------------------------------------------------------------------
// Fake models
// ---------------------------------------------------------------------------

/// `point = base + 10 * cpi`, bounds at `point ± spread`. Counts calls.
pub struct LinearForecaster {
    pub base: f64,
    pub spread: f64,
    pub calls: AtomicUsize,
}

impl LinearForecaster {
    pub fn new(base: f64, spread: f64) -> Self {
        Self {
            base,
            spread,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn point_for(&self, cpi: f64) -> f64 {
        self.base + 10.0 * cpi
    }
}

impl Forecaster for LinearForecaster {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(rows
            .iter()
            .map(|r| {
                let point = self.point_for(r.get("cpi").unwrap_or(0.0));
                ForecastRow {
                    timestamp: r.timestamp,
                    point_estimate: point,
                    upper_bound: point + self.spread,
                    lower_bound: point - self.spread,
                }
            })
            .collect())
    }

    fn required_covariates(&self) -> Vec<&str> {
        vec!["cpi"]
    }
}

/// A broken model that drops the last row of every batch.
pub struct TruncatingForecaster;

impl Forecaster for TruncatingForecaster {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>> {
        Ok(rows
            .iter()
            .take(rows.len().saturating_sub(1))
            .map(|r| ForecastRow {
                timestamp: r.timestamp,
                point_estimate: 1.0,
                upper_bound: 2.0,
                lower_bound: 0.0,
            })
            .collect())
    }
}

pub fn sample_context() -> ForecastContext {
    ForecastContext::new(
        LinearForecaster::new(1000.0, 25.0),
        sample_table(),
        "Test Forecaster",
    )
    .unwrap()
}

/// Returns every row one quarter later than asked for.
pub struct ShiftedForecaster;

impl Forecaster for ShiftedForecaster {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>> {
        Ok(rows
            .iter()
            .map(|r| ForecastRow {
                timestamp: r.timestamp + chrono::Months::new(3),
                point_estimate: 1.0,
                upper_bound: 2.0,
                lower_bound: 0.0,
            })
            .collect())
    }
}

/// Produces a NaN point estimate for every row.
pub struct NanForecaster;

impl Forecaster for NanForecaster {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>> {
        Ok(rows
            .iter()
            .map(|r| ForecastRow {
                timestamp: r.timestamp,
                point_estimate: f64::NAN,
                upper_bound: 2.0,
                lower_bound: 0.0,
            })
            .collect())
    }
}
