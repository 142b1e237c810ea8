use std::sync::Arc;

use gdp_forecast::config::ServerConfig;
use gdp_forecast::{server, ForecastContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Optional; a missing .env is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gdp_forecast=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "gdp-forecast server failed");
        std::process::exit(1);
    }
}

async fn run() -> gdp_forecast::Result<()> {
    let config = ServerConfig::from_env()?;

    let ctx = ForecastContext::builder()
        .model_path(&config.model_path)
        .covariates_path(&config.covariates_path)
        .build()?;
    tracing::info!("{ctx}");

    let app = server::router(Arc::new(ctx));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "gdp-forecast v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
