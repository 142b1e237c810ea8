//! HTTP surface: an axum router over a shared [`ForecastContext`].

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;

use crate::ForecastContext;

/// Build the application router with request tracing and permissive CORS.
pub fn router(ctx: Arc<ForecastContext>) -> Router {
    Router::new()
        .route("/", get(routes::service_info))
        .route("/health", get(routes::health))
        .route("/predict", get(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
