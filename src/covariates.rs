//! Future covariate table loaded once from a static CSV file.
//!
//! The table carries one row per future quarter: a `ds` date column plus
//! whatever numeric regressor columns the forecasting model was trained on.
//! Rows are held in ascending timestamp order so a single year is always a
//! contiguous slice.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::config;
use crate::error::{ForecastError, Result};

// ---------------------------------------------------------------------------
// FutureCovariateRow
// ---------------------------------------------------------------------------

/// A single future timestamp and the covariate values the model expects.
#[derive(Debug, Clone, PartialEq)]
pub struct FutureCovariateRow {
    pub timestamp: NaiveDate,
    pub covariates: BTreeMap<String, f64>,
}

impl FutureCovariateRow {
    /// Create a row with no covariates.
    pub fn new(timestamp: NaiveDate) -> Self {
        Self {
            timestamp,
            covariates: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach a covariate value.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.covariates.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.covariates.get(name).copied()
    }
}

// ---------------------------------------------------------------------------
// CovariateTable
// ---------------------------------------------------------------------------

/// Immutable, timestamp-sorted table of future covariate rows.
#[derive(Debug, Clone, Default)]
pub struct CovariateTable {
    columns: Vec<String>,
    rows: Vec<FutureCovariateRow>,
}

impl CovariateTable {
    /// Build a table from already-parsed rows.
    ///
    /// Rows are sorted by timestamp (stable). `columns` lists the covariate
    /// names in their original header order.
    pub fn from_rows(columns: Vec<String>, mut rows: Vec<FutureCovariateRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { columns, rows }
    }

    /// Load the table from a CSV file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ForecastError::Covariates(format!("cannot open {}: {e}", path.display()))
        })?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            years = ?table.years(),
            "loaded future covariate table"
        );
        Ok(table)
    }

    /// Parse the table from any CSV source with a header row.
    ///
    /// The `ds` column holds the date (`YYYY-MM-DD`, optionally followed by a
    /// time part); every other column must be numeric.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h == config::DATE_COLUMN)
            .ok_or_else(|| {
                ForecastError::Covariates(format!(
                    "missing required date column '{}'",
                    config::DATE_COLUMN
                ))
            })?;

        let columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut rows = Vec::new();
        for (n, record) in rdr.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = n + 2;

            let raw_date = record.get(date_idx).unwrap_or_default();
            let timestamp = parse_date(raw_date).ok_or_else(|| {
                ForecastError::Covariates(format!(
                    "line {line}: cannot parse '{raw_date}' in column '{}' as a date",
                    config::DATE_COLUMN
                ))
            })?;

            let mut row = FutureCovariateRow::new(timestamp);
            for (idx, name) in &columns {
                let raw = record.get(*idx).unwrap_or_default();
                if raw.is_empty() {
                    return Err(ForecastError::Covariates(format!(
                        "line {line}: missing value in column '{name}'"
                    )));
                }
                let value: f64 = raw.parse().map_err(|_| {
                    ForecastError::Covariates(format!(
                        "line {line}: cannot parse '{raw}' in column '{name}' as a number"
                    ))
                })?;
                if !value.is_finite() {
                    return Err(ForecastError::Covariates(format!(
                        "line {line}: non-finite value '{raw}' in column '{name}'"
                    )));
                }
                row.covariates.insert(name.clone(), value);
            }
            rows.push(row);
        }

        let columns = columns.into_iter().map(|(_, name)| name).collect();
        Ok(Self::from_rows(columns, rows))
    }

    /// Rows whose timestamp falls in `year`, in ascending timestamp order.
    ///
    /// Returns an empty slice when the table has no rows for that year.
    pub fn rows_for_year(&self, year: i32) -> &[FutureCovariateRow] {
        let start = self.rows.partition_point(|r| r.timestamp.year() < year);
        let end = self.rows.partition_point(|r| r.timestamp.year() <= year);
        &self.rows[start..end]
    }

    /// Distinct calendar years covered by the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.timestamp.year()).collect();
        years.dedup();
        years
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[FutureCovariateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accepts a bare date or a date followed by a time (` ` or `T` separated).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
