use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::{json, Value};

use super::error::AppError;
use crate::config::{self, MAX_YEAR, MIN_YEAR};
use crate::forecast::ForecastResponse;
use crate::ForecastContext;

/// Reject years outside the forecast range before they reach the context.
pub fn validate_year(year: i32) -> Result<i32, AppError> {
    if config::year_in_range(year) {
        Ok(year)
    } else {
        Err(AppError::unprocessable(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )))
    }
}

/// Pull `year` out of the decoded query pairs.
///
/// A repeated `year` takes its last value.
pub fn year_param(pairs: &[(String, String)]) -> Result<i32, AppError> {
    let raw = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "year")
        .map(|(_, value)| value.trim())
        .ok_or_else(|| AppError::unprocessable("missing required query parameter: year"))?;

    raw.parse()
        .map_err(|_| AppError::unprocessable(format!("year must be an integer, got '{raw}'")))
}

/// GET /predict?year=2026
///
/// Quarterly GDP forecasts for one year in the supported range.
pub async fn predict(
    State(ctx): State<Arc<ForecastContext>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::unprocessable(e.body_text()))?;
    let year = validate_year(year_param(&pairs)?)?;

    Ok(Json(ctx.forecast(year)?))
}

/// GET /
///
/// Describes the service, the unit of the forecasts and the accepted years.
pub async fn service_info(State(ctx): State<Arc<ForecastContext>>) -> Json<Value> {
    Json(json!({
        "title": "Singapore GDP Forecast API",
        "description": format!(
            "Quarterly GDP forecasts in {} from a Prophet-based time series model. \
             Use /predict?year=N with N between {MIN_YEAR} and {MAX_YEAR}.",
            config::GDP_UNIT
        ),
        "version": env!("CARGO_PKG_VERSION"),
        "model": ctx.model_name(),
        "unit": config::GDP_UNIT,
        "years": { "min": MIN_YEAR, "max": MAX_YEAR },
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
