//! Schema reference: the ordered feature list and training medians a model depends on
//!
//! The schema is derived once from the training table (minus the target column)
//! and is immutable afterwards. Both the feature frame builder and the batch
//! preprocessor align their output to it.

use crate::error::{HouselyticsError, Result};
use crate::utils::DataLoader;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Ordered feature names plus per-feature training medians
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaReference {
    feature_names: Vec<String>,
    medians: HashMap<String, f64>,
    target: String,
}

/// Check whether a dtype takes part in median computation
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
    )
}

impl SchemaReference {
    /// Build a schema directly from its parts
    ///
    /// Medians for names outside `feature_names` are discarded.
    pub fn new(
        feature_names: Vec<String>,
        medians: HashMap<String, f64>,
        target: impl Into<String>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(feature_names.len());
        for name in &feature_names {
            if !seen.insert(name.as_str()) {
                return Err(HouselyticsError::SchemaError(format!(
                    "duplicate feature '{}'",
                    name
                )));
            }
        }

        let medians = medians
            .into_iter()
            .filter(|(name, _)| seen.contains(name.as_str()))
            .collect();

        Ok(Self {
            feature_names,
            medians,
            target: target.into(),
        })
    }

    /// Derive the schema from a training table
    ///
    /// Fails with [`HouselyticsError::SchemaError`] when `target` is not a column.
    pub fn from_training_frame(df: &DataFrame, target: &str) -> Result<Self> {
        if df.column(target).is_err() {
            return Err(HouselyticsError::SchemaError(format!(
                "target column '{}' not found in training table",
                target
            )));
        }

        let mut feature_names = Vec::with_capacity(df.width().saturating_sub(1));
        let mut medians = HashMap::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if name == target {
                continue;
            }

            if is_numeric_dtype(col.dtype()) {
                let series = col.as_materialized_series().cast(&DataType::Float64)?;
                match series.f64()?.median() {
                    Some(median) => {
                        medians.insert(name.clone(), median);
                    }
                    None => debug!(feature = %name, "No non-null values, median unavailable"),
                }
            }

            feature_names.push(name);
        }

        let schema = Self::new(feature_names, medians, target)?;
        info!(
            features = schema.len(),
            medians = schema.medians.len(),
            target = %target,
            "Derived schema reference"
        );
        Ok(schema)
    }

    /// Load the training CSV and derive the schema from it
    pub fn from_csv(path: impl AsRef<Path>, target: &str) -> Result<Self> {
        let df = DataLoader::new().load_csv(path)?;
        Self::from_training_frame(&df, target)
    }

    /// Feature names in model order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn medians(&self) -> &HashMap<String, f64> {
        &self.medians
    }

    /// Training median for a feature, if it was numeric and had values
    pub fn median(&self, name: &str) -> Option<f64> {
        self.medians.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Column index of a feature in model order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// Name of the excluded target column
    pub fn target(&self) -> &str {
        &self.target
    }
}
