use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{ForecastError, Result};

/// First forecast year the service answers for (inclusive).
pub const MIN_YEAR: i32 = 2025;
/// Last forecast year the service answers for (inclusive).
pub const MAX_YEAR: i32 = 2030;

pub const MODEL_NAME: &str = "Prophet GDP Forecaster";
pub const DATE_COLUMN: &str = "ds";
pub const GDP_UNIT: &str = "SGD Million";

pub const DEFAULT_MODEL_PATH: &str = "data/sg_gdp_prophet.json";
pub const DEFAULT_COVARIATES_PATH: &str = "data/FutureValues.csv";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Process-level settings for the HTTP server binary.
///
/// Read from the environment (`HOST`, `PORT`, `GDP_MODEL_PATH`,
/// `GDP_COVARIATES_PATH`); anything unset falls back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub covariates_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            covariates_path: PathBuf::from(DEFAULT_COVARIATES_PATH),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ForecastError::Config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            model_path: get("GDP_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            covariates_path: get("GDP_COVARIATES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.covariates_path),
        })
    }

    /// Resolve `host:port` into a bindable socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ForecastError::Config(format!(
                    "invalid HOST:PORT configuration '{}:{}'",
                    self.host, self.port
                ))
            })
    }
}
