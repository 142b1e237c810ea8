//! Quarterly GDP forecast service.
//!
//! Loads a fitted Prophet-style model artifact and a table of future
//! covariates once at startup, then answers "forecast for year N" queries
//! from that immutable state. The optional `server` feature (on by default)
//! exposes the query over HTTP as `GET /predict?year=N`.
//!
//! # Quick start
//!
//! ```no_run
//! use gdp_forecast::ForecastContext;
//!
//! let ctx = ForecastContext::builder()
//!     .model_path("data/sg_gdp_prophet.json")
//!     .covariates_path("data/FutureValues.csv")
//!     .build()
//!     .unwrap();
//!
//! let response = ctx.forecast(2026).unwrap();
//! for entry in &response.gdp_value {
//!     println!("{} {}", entry.quarter, entry.gdp_prediction);
//! }
//! ```

pub mod config;
pub mod covariates;
pub mod error;
pub mod forecast;
pub mod model;
#[cfg(feature = "server")]
pub mod server;

pub use covariates::{CovariateTable, FutureCovariateRow};
pub use error::{ForecastError, Result};
pub use forecast::{ForecastResponse, ForecastRow, Quarter, QuarterlyEstimate};
pub use model::{Forecaster, ProphetModel};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ForecastContextBuilder
// ---------------------------------------------------------------------------

/// Builder for loading a [`ForecastContext`] from artifacts on disk.
///
/// Use [`ForecastContext::builder()`] to obtain a builder. Unset paths fall
/// back to [`config::DEFAULT_MODEL_PATH`] and
/// [`config::DEFAULT_COVARIATES_PATH`].
pub struct ForecastContextBuilder {
    model_path: PathBuf,
    covariates_path: PathBuf,
    model_name: String,
}

impl Default for ForecastContextBuilder {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(config::DEFAULT_MODEL_PATH),
            covariates_path: PathBuf::from(config::DEFAULT_COVARIATES_PATH),
            model_name: config::MODEL_NAME.to_string(),
        }
    }
}

impl ForecastContextBuilder {
    /// Path to the model artifact (`.json` or `.json.gz`).
    pub fn model_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.model_path = path.as_ref().to_path_buf();
        self
    }

    /// Path to the future covariate CSV.
    pub fn covariates_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.covariates_path = path.as_ref().to_path_buf();
        self
    }

    /// Label reported in the `model` field of every response.
    ///
    /// Defaults to [`config::MODEL_NAME`].
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Load both artifacts and check they fit together.
    pub fn build(self) -> Result<ForecastContext> {
        let model = ProphetModel::from_path(&self.model_path)?;
        let table = CovariateTable::from_path(&self.covariates_path)?;
        ForecastContext::new(model, table, self.model_name)
    }
}

// ---------------------------------------------------------------------------
// ForecastContext
// ---------------------------------------------------------------------------

/// Immutable, process-wide forecasting state: the loaded model and the
/// future covariate table.
///
/// Created once at startup and shared read-only between request handlers.
pub struct ForecastContext {
    model: Box<dyn Forecaster>,
    table: CovariateTable,
    model_name: String,
}

impl ForecastContext {
    /// Create a new builder for loading the context from disk.
    pub fn builder() -> ForecastContextBuilder {
        ForecastContextBuilder::default()
    }

    /// Assemble a context from an already-loaded model and table.
    ///
    /// Fails if the model reads a covariate column the table does not have.
    pub fn new<F>(model: F, table: CovariateTable, model_name: impl Into<String>) -> Result<Self>
    where
        F: Forecaster + 'static,
    {
        let missing: Vec<String> = model
            .required_covariates()
            .into_iter()
            .filter(|name| !table.columns().iter().any(|c| c.as_str() == *name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::Config(format!(
                "covariate table is missing model regressor column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            model: Box::new(model),
            table,
            model_name: model_name.into(),
        })
    }

    /// Forecast every quarter of `year` covered by the covariate table.
    ///
    /// Selects the table rows for `year`, runs them through the model, and
    /// rounds the estimates to two decimals. Entries keep ascending timestamp
    /// order. Range checking of `year` is left to the caller.
    ///
    /// # Errors
    ///
    /// [`ForecastError::NoDataForYear`] if the table has no rows for `year`;
    /// [`ForecastError::ModelOutput`] if the model returns a different number
    /// of rows than it was given, rows for other timestamps, or non-finite
    /// estimates.
    pub fn forecast(&self, year: i32) -> Result<ForecastResponse> {
        let rows = self.table.rows_for_year(year);
        if rows.is_empty() {
            tracing::warn!(year, "no covariate rows for requested year");
            return Err(ForecastError::NoDataForYear(year));
        }

        let predicted = self.model.predict(rows)?;
        if predicted.len() != rows.len() {
            return Err(ForecastError::ModelOutput(format!(
                "model returned {} rows for {} inputs",
                predicted.len(),
                rows.len()
            )));
        }
        for (input, output) in rows.iter().zip(&predicted) {
            if input.timestamp != output.timestamp {
                return Err(ForecastError::ModelOutput(format!(
                    "model returned a row for {} in place of {}",
                    output.timestamp, input.timestamp
                )));
            }
            if !(output.point_estimate.is_finite()
                && output.upper_bound.is_finite()
                && output.lower_bound.is_finite())
            {
                return Err(ForecastError::ModelOutput(format!(
                    "model returned a non-finite estimate for {}",
                    output.timestamp
                )));
            }
        }
        tracing::debug!(year, rows = rows.len(), "forecast computed");

        Ok(ForecastResponse {
            year,
            model: self.model_name.clone(),
            gdp_value: predicted.iter().map(QuarterlyEstimate::from).collect(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn table(&self) -> &CovariateTable {
        &self.table
    }

    /// Calendar years the covariate table has rows for.
    pub fn years(&self) -> Vec<i32> {
        self.table.years()
    }
}

impl fmt::Display for ForecastContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years: Vec<String> = self.years().iter().map(|y| y.to_string()).collect();
        write!(
            f,
            "ForecastContext(model={}, rows={}, years=[{}])",
            self.model_name,
            self.table.len(),
            years.join(", ")
        )
    }
}
