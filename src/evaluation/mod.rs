//! Model performance on the training table
//!
//! A seeded hold-out split, R² on both partitions, and test MAE, RMSE and
//! residuals.

use crate::config::ValuationConfig;
use crate::error::{HouselyticsError, Result};
use crate::model::PriceModel;
use crate::preprocessing::align_encoded;
use crate::schema::SchemaReference;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

fn check_pair(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(HouselyticsError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(HouselyticsError::InvalidInput(
            "cannot score an empty sample".to_string(),
        ));
    }
    Ok(())
}

/// Coefficient of determination
///
/// A constant target scores 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let total: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Ok(total / y_true.len() as f64)
}

pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let total: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    Ok((total / y_true.len() as f64).sqrt())
}

/// Shuffle row indices with a fixed seed and split off `ceil(n * test_fraction)` for testing
///
/// Returns `(train, test)`; the two sets partition `0..n_rows`.
pub fn train_test_split(n_rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let train = indices.split_off(n_test.min(n_rows));
    (train, indices)
}

/// Scores for a model on a held-out split of the training table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_mae: f64,
    pub test_rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// Actual minus predicted, per test row
    pub residuals: Vec<f64>,
}

fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec("idx".into(), rows.iter().map(|&i| i as IdxSize).collect());
    Ok(df.take(&idx)?)
}

fn target_values(df: &DataFrame, target: &str) -> Result<Vec<f64>> {
    let series = df
        .column(target)
        .map_err(|_| HouselyticsError::SchemaError(format!("target column '{}' not found", target)))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.ok_or_else(|| HouselyticsError::DataError(format!("missing target at row {}", i)))
        })
        .collect()
}

/// Evaluate `model` on a seeded train/test split of the training table
pub fn evaluate(
    model: &dyn PriceModel,
    training: &DataFrame,
    schema: &SchemaReference,
    config: &ValuationConfig,
) -> Result<EvaluationReport> {
    config.validate()?;
    let (train_idx, test_idx) =
        train_test_split(training.height(), config.test_fraction, config.random_state);

    let score = |rows: &[usize]| -> Result<(Vec<f64>, Vec<f64>)> {
        let part = take_rows(training, rows)?;
        let y_true = target_values(&part, schema.target())?;
        let features = align_encoded(&part, schema)?;
        let y_pred = model.predict(&features)?;
        Ok((y_true, y_pred))
    };

    let (train_true, train_pred) = score(&train_idx)?;
    let (test_true, test_pred) = score(&test_idx)?;

    let report = EvaluationReport {
        train_r2: r2_score(&train_true, &train_pred)?,
        test_r2: r2_score(&test_true, &test_pred)?,
        test_mae: mean_absolute_error(&test_true, &test_pred)?,
        test_rmse: root_mean_squared_error(&test_true, &test_pred)?,
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        residuals: test_true.iter().zip(&test_pred).map(|(t, p)| t - p).collect(),
    };

    info!(
        train_r2 = report.train_r2,
        test_r2 = report.test_r2,
        mae = report.test_mae,
        rmse = report.test_rmse,
        "Evaluated model"
    );
    Ok(report)
}
