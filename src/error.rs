//! Error types for the Houselytics valuation core

use thiserror::Error;

/// Result type alias for Houselytics operations
pub type Result<T> = std::result::Result<T, HouselyticsError>;

/// Main error type for the valuation core
#[derive(Error, Debug)]
pub enum HouselyticsError {
    /// The model contract cannot be established from the training table
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for HouselyticsError {
    fn from(err: polars::error::PolarsError) -> Self {
        HouselyticsError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for HouselyticsError {
    fn from(err: serde_json::Error) -> Self {
        HouselyticsError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for HouselyticsError {
    fn from(err: ndarray::ShapeError) -> Self {
        HouselyticsError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
