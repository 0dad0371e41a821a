//! Valuation configuration

use crate::error::{HouselyticsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the sale price column in the training table
pub const DEFAULT_TARGET: &str = "SalePrice";

/// Configuration for loading the valuation context and running reports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Processed training table used to derive the schema reference
    pub training_data: PathBuf,

    /// Raw table of inherited properties for portfolio appraisal
    pub inherited_data: PathBuf,

    /// Serialized model artifact
    pub model_path: PathBuf,

    /// Target column excluded from the feature schema
    pub target_column: String,

    /// Fraction of rows held out when evaluating the model
    pub test_fraction: f64,

    /// Seed for the train/test split
    pub random_state: u64,

    /// Number of correlations shown by the insights report
    pub top_correlations: usize,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            training_data: PathBuf::from("data/processed/clean_train.csv"),
            inherited_data: PathBuf::from("data/raw/inherited_houses.csv"),
            model_path: PathBuf::from("src/house_price_model.json"),
            target_column: DEFAULT_TARGET.to_string(),
            test_fraction: 0.2,
            random_state: 42,
            top_correlations: 10,
        }
    }
}

impl ValuationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_training_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.training_data = path.into();
        self
    }

    pub fn with_inherited_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.inherited_data = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    /// Builder method to set the held-out fraction and split seed
    pub fn with_split(mut self, test_fraction: f64, random_state: u64) -> Self {
        self.test_fraction = test_fraction;
        self.random_state = random_state;
        self
    }

    pub fn with_top_correlations(mut self, n: usize) -> Self {
        self.top_correlations = n;
        self
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<()> {
        if self.target_column.trim().is_empty() {
            return Err(HouselyticsError::ConfigError(
                "target_column must not be empty".to_string(),
            ));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(HouselyticsError::ConfigError(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValuationConfig::default();
        assert_eq!(config.target_column, "SalePrice");
        assert_eq!(config.random_state, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ValuationConfig::new()
            .with_training_data("train.csv")
            .with_model_path("model.json")
            .with_split(0.25, 7)
            .with_top_correlations(5);

        assert_eq!(config.training_data, PathBuf::from("train.csv"));
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.top_correlations, 5);
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let config = ValuationConfig::new().with_split(1.0, 42);
        assert!(matches!(
            config.validate(),
            Err(HouselyticsError::ConfigError(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ValuationConfig =
            serde_json::from_str(r#"{"target_column": "Price"}"#).unwrap();
        assert_eq!(config.target_column, "Price");
        assert_eq!(config.test_fraction, 0.2);
    }
}
