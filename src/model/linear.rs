//! Linear price model artifact

use super::{check_alignment, FeatureImportances, ModelMetadata, PriceModel};
use crate::error::{HouselyticsError, Result};
use crate::preprocessing::FeatureMatrix;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Linear regression artifact: `price = intercept + Σ coefficient · feature`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPriceModel {
    pub feature_names: Vec<String>,
    pub coefficients: Array1<f64>,
    pub intercept: f64,
    /// Explicit importance weights; derived from coefficients when absent
    #[serde(default)]
    pub importances: Option<Vec<f64>>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl LinearPriceModel {
    /// Create a model, checking that every feature has a coefficient
    pub fn new(feature_names: Vec<String>, coefficients: Array1<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
            importances: None,
            metadata: ModelMetadata::default().with_model_type("linear"),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_importances(mut self, importances: Vec<f64>) -> Result<Self> {
        self.importances = Some(importances);
        self.validate()?;
        Ok(self)
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn validate(&self) -> Result<()> {
        let n = self.feature_names.len();
        if self.coefficients.len() != n {
            return Err(HouselyticsError::ShapeError {
                expected: format!("{} coefficients", n),
                actual: format!("{} coefficients", self.coefficients.len()),
            });
        }
        if let Some(imp) = &self.importances {
            if imp.len() != n {
                return Err(HouselyticsError::ShapeError {
                    expected: format!("{} importances", n),
                    actual: format!("{} importances", imp.len()),
                });
            }
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(HouselyticsError::ModelError(
                "non-finite parameter in model artifact".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a JSON artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HouselyticsError::ModelError(format!("{}: {}", path.display(), e))
        })?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;

        info!(
            path = %path.display(),
            name = %model.metadata.name,
            features = model.feature_names.len(),
            "Loaded price model"
        );
        Ok(model)
    }

    /// Write the artifact as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl PriceModel for LinearPriceModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        check_alignment(&self.feature_names, features)?;
        let preds = features.values().dot(&self.coefficients) + self.intercept;
        Ok(preds.to_vec())
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_importances(&self) -> Option<FeatureImportances> {
        let weights = match &self.importances {
            Some(w) => w.clone(),
            None => {
                let total: f64 = self.coefficients.iter().map(|c| c.abs()).sum();
                if total == 0.0 {
                    return None;
                }
                self.coefficients.iter().map(|c| c.abs() / total).collect()
            }
        };
        FeatureImportances::new(self.feature_names.clone(), weights).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{build_feature_frame, UserValues};
    use crate::schema::SchemaReference;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::collections::HashMap;

    fn model() -> LinearPriceModel {
        LinearPriceModel::new(
            vec!["OverallQual".into(), "GrLivArea".into()],
            array![20000.0, 50.0],
            -10000.0,
        )
        .unwrap()
    }

    fn schema(names: &[&str]) -> SchemaReference {
        SchemaReference::new(
            names.iter().map(|s| s.to_string()).collect(),
            HashMap::from([("OverallQual".to_string(), 6.0), ("GrLivArea".to_string(), 1464.0)]),
            "SalePrice",
        )
        .unwrap()
    }

    #[test]
    fn test_predict_single_row() {
        let user = UserValues::new().with("OverallQual", 7.0).with("GrLivArea", 2000.0);
        let frame = build_feature_frame(&user, &schema(&["OverallQual", "GrLivArea"]));
        let preds = model().predict(&frame).unwrap();
        assert_eq!(preds.len(), 1);
        assert_relative_eq!(preds[0], 230000.0);
    }

    #[test]
    fn test_predict_rejects_misaligned_columns() {
        let frame = build_feature_frame(&UserValues::new(), &schema(&["GrLivArea", "OverallQual"]));
        let err = model().predict(&frame).unwrap_err();
        assert!(matches!(err, HouselyticsError::ShapeError { .. }));
    }

    #[test]
    fn test_coefficient_count_checked() {
        let err = LinearPriceModel::new(vec!["OverallQual".into()], array![1.0, 2.0], 0.0).unwrap_err();
        assert!(matches!(err, HouselyticsError::ShapeError { .. }));
    }

    #[test]
    fn test_derived_importances() {
        let imp = model().feature_importances().unwrap();
        assert_relative_eq!(imp.get("OverallQual").unwrap(), 20000.0 / 20050.0);
        assert_eq!(imp.top_k(1)[0].0, "OverallQual");
    }

    #[test]
    fn test_explicit_importances() {
        let m = model().with_importances(vec![0.3, 0.7]).unwrap();
        assert_eq!(m.feature_importances().unwrap().top_k(1), vec![("GrLivArea", 0.7)]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model().save(&path).unwrap();

        let loaded = LinearPriceModel::load(&path).unwrap();
        assert_eq!(loaded.feature_names, model().feature_names);
        assert_eq!(loaded.intercept, -10000.0);
        assert_eq!(loaded.metadata.model_type, "linear");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearPriceModel::load("missing/model.json").unwrap_err();
        assert!(matches!(err, HouselyticsError::ModelError(_)));
    }
}
