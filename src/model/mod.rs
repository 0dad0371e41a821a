//! Price model contract
//!
//! The valuation core treats the trained model as an opaque artifact. Anything
//! that can score a schema-aligned [`FeatureMatrix`] implements [`PriceModel`].

mod linear;

pub use linear::LinearPriceModel;

use crate::error::{HouselyticsError, Result};
use crate::preprocessing::FeatureMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A trained regression model producing one price per feature row
pub trait PriceModel: Send + Sync {
    /// Predict one value per row of `features`
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Column order the model was trained on
    fn feature_names(&self) -> &[String];

    /// Per-feature importance weights, if the model exposes them
    fn feature_importances(&self) -> Option<FeatureImportances> {
        None
    }
}

/// Fail unless `features` has exactly the columns `expected`, in order
pub fn check_alignment(expected: &[String], features: &FeatureMatrix) -> Result<()> {
    if features.columns() == expected {
        return Ok(());
    }

    let first_diff = expected
        .iter()
        .zip(features.columns())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.len().min(features.n_cols()));

    Err(HouselyticsError::ShapeError {
        expected: format!(
            "{} columns in training order (first mismatch at {})",
            expected.len(),
            first_diff
        ),
        actual: format!("{} columns", features.n_cols()),
    })
}

/// Model metadata stored alongside the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    pub target_name: String,
    pub model_type: String,
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            name: "house_price_model".to_string(),
            version: "1.0.0".to_string(),
            target_name: "SalePrice".to_string(),
            model_type: "unknown".to_string(),
            metrics: HashMap::new(),
        }
    }
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_name = target.into();
        self
    }

    pub fn add_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}

/// Feature importance weights aligned to the model's column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportances {
    names: Vec<String>,
    weights: Vec<f64>,
}

impl FeatureImportances {
    pub fn new(names: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        if names.len() != weights.len() {
            return Err(HouselyticsError::ShapeError {
                expected: format!("{} weights", names.len()),
                actual: format!("{} weights", weights.len()),
            });
        }
        Ok(Self { names, weights })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.weights[i])
    }

    /// All (name, weight) pairs, highest weight first
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut pairs: Vec<(&str, f64)> = self
            .names
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        pairs
    }

    /// The `k` most important features
    pub fn top_k(&self, k: usize) -> Vec<(&str, f64)> {
        let mut sorted = self.sorted();
        sorted.truncate(k);
        sorted
    }
}
