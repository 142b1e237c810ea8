//! Forecasting model seam and the Prophet-style artifact model.
//!
//! The HTTP layer only ever talks to [`Forecaster`]. [`ProphetModel`] is the
//! production implementation: the parameters of a fitted additive model
//! (piecewise-linear trend, Fourier seasonalities, linear extra regressors)
//! exported to JSON, optionally gzip-compressed.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::covariates::FutureCovariateRow;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastRow;

// ---------------------------------------------------------------------------
// Forecaster
// ---------------------------------------------------------------------------

/// A loaded forecasting model.
///
/// `predict` must return exactly one [`ForecastRow`] per input row, in input
/// order. Implementations are shared across request handlers and must not
/// mutate themselves while predicting.
pub trait Forecaster: Send + Sync {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>>;

    /// Covariate columns the model reads from each row.
    fn required_covariates(&self) -> Vec<&str> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Artifact components
// ---------------------------------------------------------------------------

/// Piecewise-linear trend in scaled time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    /// Base growth rate.
    pub k: f64,
    /// Base offset.
    pub m: f64,
    /// Changepoint locations in scaled time, ascending.
    #[serde(default)]
    pub changepoints: Vec<f64>,
    /// Rate adjustment applied at each changepoint.
    #[serde(default)]
    pub deltas: Vec<f64>,
}

impl LinearTrend {
    /// Trend value at scaled time `t`. Offsets are adjusted at every
    /// changepoint so the curve stays continuous.
    pub fn value(&self, t: f64) -> f64 {
        let mut k = self.k;
        let mut m = self.m;
        for (&cp, &delta) in self.changepoints.iter().zip(&self.deltas) {
            if t >= cp {
                k += delta;
                m -= cp * delta;
            }
        }
        k * t + m
    }
}

/// Fourier seasonality; `coefficients` holds (sin, cos) pairs for orders 1..N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub name: String,
    pub period_days: f64,
    pub coefficients: Vec<f64>,
}

impl Seasonality {
    /// Seasonal component at `days` since the Unix epoch.
    pub fn value(&self, days: f64) -> f64 {
        self.coefficients
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| {
                let x = 2.0 * PI * (i as f64 + 1.0) * days / self.period_days;
                pair[0] * x.sin() + pair[1] * x.cos()
            })
            .sum()
    }
}

/// Additive extra regressor, standardized before the coefficient is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regressor {
    pub name: String,
    pub mu: f64,
    pub std: f64,
    pub coefficient: f64,
}

impl Regressor {
    pub fn value(&self, x: f64) -> f64 {
        (x - self.mu) / self.std * self.coefficient
    }
}

fn default_interval_width() -> f64 {
    0.8
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

// ---------------------------------------------------------------------------
// ProphetModel
// ---------------------------------------------------------------------------

/// Fitted Prophet-style additive model.
///
/// `yhat = y_scale * (trend(t) + seasonalities(ds) + regressors(row))` where
/// `t = (ds - start) / t_scale_days`. Bounds are a symmetric normal interval
/// of width `interval_width` whose spread grows with distance past
/// `history_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProphetModel {
    pub start: NaiveDate,
    pub t_scale_days: f64,
    pub y_scale: f64,
    pub history_end: NaiveDate,
    pub trend: LinearTrend,
    #[serde(default)]
    pub seasonalities: Vec<Seasonality>,
    #[serde(default)]
    pub regressors: Vec<Regressor>,
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,
    pub sigma_obs: f64,
    #[serde(default)]
    pub trend_sigma: f64,
}

impl ProphetModel {
    /// Load and validate a model artifact (handles `.gz` transparently).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ForecastError::Model(format!("cannot open {}: {e}", path.display())))?;
        let reader = BufReader::new(file);

        let model = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            Self::from_reader(GzDecoder::new(reader))?
        } else {
            Self::from_reader(reader)?
        };

        tracing::info!(
            path = %path.display(),
            seasonalities = model.seasonalities.len(),
            regressors = model.regressors.len(),
            "loaded forecast model artifact"
        );
        Ok(model)
    }

    /// Parse and validate a model artifact from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: ProphetModel = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    /// Reject parameter sets that cannot produce finite forecasts.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ForecastError::Model(msg)) };

        if !positive(self.t_scale_days) {
            return invalid(format!("t_scale_days must be positive, got {}", self.t_scale_days));
        }
        if !positive(self.y_scale) {
            return invalid(format!("y_scale must be positive, got {}", self.y_scale));
        }
        if self.trend.changepoints.len() != self.trend.deltas.len() {
            return invalid(format!(
                "trend has {} changepoints but {} deltas",
                self.trend.changepoints.len(),
                self.trend.deltas.len()
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return invalid(format!(
                "interval_width must lie strictly between 0 and 1, got {}",
                self.interval_width
            ));
        }
        if self.sigma_obs < 0.0 || self.trend_sigma < 0.0 {
            return invalid("sigma_obs and trend_sigma must be non-negative".to_string());
        }
        for s in &self.seasonalities {
            if !positive(s.period_days) {
                return invalid(format!("seasonality '{}' has a non-positive period", s.name));
            }
            if s.coefficients.len() % 2 != 0 {
                return invalid(format!(
                    "seasonality '{}' needs (sin, cos) coefficient pairs, got {} values",
                    s.name,
                    s.coefficients.len()
                ));
            }
        }
        for r in &self.regressors {
            if r.std == 0.0 {
                return invalid(format!("regressor '{}' has zero std", r.name));
            }
        }
        Ok(())
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.t_scale_days
    }

    /// Normal quantile for the configured interval width.
    fn interval_z(&self) -> Result<f64> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::Model(e.to_string()))?;
        Ok(normal.inverse_cdf(0.5 + self.interval_width / 2.0))
    }

    fn predict_row(&self, row: &FutureCovariateRow, z: f64) -> Result<ForecastRow> {
        let t = self.scaled_time(row.timestamp);
        // NaiveDate::default() is the Unix epoch.
        let days = (row.timestamp - NaiveDate::default()).num_days() as f64;

        let mut y = self.trend.value(t);
        y += self.seasonalities.iter().map(|s| s.value(days)).sum::<f64>();
        for r in &self.regressors {
            let x = row.get(&r.name).ok_or_else(|| {
                ForecastError::Model(format!(
                    "row for {} lacks covariate '{}'",
                    row.timestamp, r.name
                ))
            })?;
            y += r.value(x);
        }

        let horizon = (t - self.scaled_time(self.history_end)).max(0.0);
        let sd = self.sigma_obs.hypot(self.trend_sigma * horizon);
        let point = y * self.y_scale;
        let spread = z * sd * self.y_scale;

        Ok(ForecastRow {
            timestamp: row.timestamp,
            point_estimate: point,
            upper_bound: point + spread,
            lower_bound: point - spread,
        })
    }
}

impl Forecaster for ProphetModel {
    fn predict(&self, rows: &[FutureCovariateRow]) -> Result<Vec<ForecastRow>> {
        let z = self.interval_z()?;
        rows.iter().map(|row| self.predict_row(row, z)).collect()
    }

    fn required_covariates(&self) -> Vec<&str> {
        self.regressors.iter().map(|r| r.name.as_str()).collect()
    }
}
