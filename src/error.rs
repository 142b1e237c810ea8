#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid covariate table: {0}")]
    Covariates(String),

    #[error("Invalid model artifact: {0}")]
    Model(String),

    #[error("Model output error: {0}")]
    ModelOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The covariate table holds no rows for the requested year.
    #[error("No data available for the specified year.")]
    NoDataForYear(i32),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
