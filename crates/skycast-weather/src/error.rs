//! Forecast and provider error types.

use thiserror::Error;

/// Failures of the normalization pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("No forecast samples to normalize")]
    EmptyInput,

    #[error("Normalization produced {produced} days, expected {expected}")]
    InsufficientData { produced: usize, expected: usize },

    #[error("Malformed forecast sample: {0}")]
    MalformedSample(String),
}

/// Failures while talking to the weather API.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
}
