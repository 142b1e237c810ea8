//! Forecast output rows and the JSON response shape served by `/predict`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Quarter
// ---------------------------------------------------------------------------

/// Calendar quarter of a date, rendered as `Q1`..`Q4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    /// Quarter number, 1 through 4.
    pub fn number(self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// ForecastRow
// ---------------------------------------------------------------------------

/// Raw model output for one future timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRow {
    pub timestamp: NaiveDate,
    pub point_estimate: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl ForecastRow {
    pub fn quarter_label(&self) -> Quarter {
        Quarter::from_date(self.timestamp)
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// One quarterly entry in the `"GDP Value"` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyEstimate {
    pub quarter: Quarter,
    pub gdp_prediction: f64,
    pub upper_boundary: f64,
    pub lower_boundary: f64,
}

impl From<&ForecastRow> for QuarterlyEstimate {
    fn from(row: &ForecastRow) -> Self {
        Self {
            quarter: row.quarter_label(),
            gdp_prediction: round2(row.point_estimate),
            upper_boundary: round2(row.upper_bound),
            lower_boundary: round2(row.lower_bound),
        }
    }
}

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub year: i32,
    pub model: String,
    #[serde(rename = "GDP Value")]
    pub gdp_value: Vec<QuarterlyEstimate>,
}
