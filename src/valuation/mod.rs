//! Valuation context: the read-only state shared by every prediction request
//!
//! The schema reference and the model are loaded once at startup and never
//! mutated afterwards. Each request builds a fresh feature matrix, scores it
//! and discards it.

mod presets;

pub use presets::{PropertyPreset, QualityTier};

use crate::config::ValuationConfig;
use crate::error::{HouselyticsError, Result};
use crate::model::{FeatureImportances, LinearPriceModel, PriceModel};
use crate::preprocessing::{build_feature_frame, preprocess_inherited, UserValues};
use crate::schema::SchemaReference;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Name of the prediction column added to annotated portfolio tables
pub const PREDICTION_COLUMN: &str = "Predicted_Value";

/// One point estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    /// User inputs that matched a schema feature
    pub inputs_used: usize,
}

/// Predictions for a table of raw property records
#[derive(Debug, Clone)]
pub struct PortfolioAppraisal {
    records: DataFrame,
    predictions: Vec<f64>,
}

impl PortfolioAppraisal {
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Aggregate portfolio value
    pub fn total(&self) -> f64 {
        self.predictions.iter().sum()
    }

    /// The raw records with a rounded `Predicted_Value` column appended
    pub fn annotated(&self) -> Result<DataFrame> {
        let rounded: Vec<i64> = self.predictions.iter().map(|p| p.round() as i64).collect();
        let mut out = self.records.clone();
        out.with_column(Column::new(PREDICTION_COLUMN.into(), rounded))
            .map_err(|e| HouselyticsError::DataError(e.to_string()))?;
        Ok(out)
    }
}

/// Schema reference and model, built once and shared read-only
#[derive(Clone)]
pub struct ValuationContext {
    schema: Arc<SchemaReference>,
    model: Arc<dyn PriceModel>,
}

impl std::fmt::Debug for ValuationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuationContext")
            .field("features", &self.schema.len())
            .field("target", &self.schema.target())
            .finish()
    }
}

impl ValuationContext {
    /// Pair a schema with a model trained on the same column order
    pub fn new(schema: SchemaReference, model: Arc<dyn PriceModel>) -> Result<Self> {
        if model.feature_names() != schema.feature_names() {
            return Err(HouselyticsError::SchemaError(format!(
                "model expects {} features, training table provides {} (or a different order)",
                model.feature_names().len(),
                schema.len()
            )));
        }
        Ok(Self {
            schema: Arc::new(schema),
            model,
        })
    }

    /// Derive the schema from the training table and load the model artifact
    pub fn load(config: &ValuationConfig) -> Result<Self> {
        config.validate()?;
        let schema = SchemaReference::from_csv(&config.training_data, &config.target_column)?;
        let model = LinearPriceModel::load(&config.model_path)?;
        Self::new(schema, Arc::new(model))
    }

    pub fn schema(&self) -> &SchemaReference {
        &self.schema
    }

    pub fn model(&self) -> &dyn PriceModel {
        self.model.as_ref()
    }

    pub fn feature_importances(&self) -> Option<FeatureImportances> {
        self.model.feature_importances()
    }

    /// Estimate the value of one property from sparse user input
    pub fn estimate(&self, user_values: &UserValues) -> Result<Estimate> {
        let frame = build_feature_frame(user_values, &self.schema);
        let value = self
            .model
            .predict(&frame)?
            .first()
            .copied()
            .ok_or_else(|| HouselyticsError::ModelError("model returned no prediction".to_string()))?;

        let estimate = Estimate {
            value,
            inputs_used: user_values.matched(&self.schema),
        };
        info!(
            value = estimate.value,
            inputs = estimate.inputs_used,
            "Generated valuation"
        );
        Ok(estimate)
    }

    /// Value every property in a raw table
    pub fn appraise_portfolio(&self, raw: &DataFrame) -> Result<PortfolioAppraisal> {
        let features = preprocess_inherited(raw, &self.schema)?;
        let predictions = self.model.predict(&features)?;
        if predictions.len() != raw.height() {
            return Err(HouselyticsError::ShapeError {
                expected: format!("{} predictions", raw.height()),
                actual: format!("{} predictions", predictions.len()),
            });
        }

        let appraisal = PortfolioAppraisal {
            records: raw.clone(),
            predictions,
        };
        info!(
            properties = appraisal.len(),
            total = appraisal.total(),
            "Appraised portfolio"
        );
        Ok(appraisal)
    }
}
