//! Batch preprocessor: align a raw property table to the schema
//!
//! Steps, per column of the raw table:
//! 1. ordinal text columns are encoded through their fixed tables
//! 2. every other column is read as `f64`, unparseable text counting as missing
//! 3. the result is reindexed to the schema, missing cells median-imputed and
//!    absent columns zero-filled

use super::encoding::OrdinalFeature;
use super::matrix::FeatureMatrix;
use super::resolve::{resolve, CellState, ValueSource};
use crate::error::Result;
use crate::schema::{is_numeric_dtype, SchemaReference};
use ndarray::Array2;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Read one raw column as optional numeric cells
fn numeric_cells(series: &Series) -> Result<Vec<Option<f64>>> {
    if is_numeric_dtype(series.dtype()) {
        let casted = series.cast(&DataType::Float64)?;
        return Ok(casted.f64()?.into_iter().collect());
    }

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect()),
        DataType::Null => Ok(vec![None; series.len()]),
        _ => {
            // anything else goes through its string form
            let casted = series.cast(&DataType::String)?;
            Ok(casted
                .str()?
                .into_iter()
                .map(|cell| cell.and_then(|s| s.trim().parse::<f64>().ok()))
                .collect())
        }
    }
}

/// Encode an ordinal column
///
/// Only text labels can match a table. Cells of any other dtype, numeric ones
/// included, take the column's default rank.
fn ordinal_cells(feature: OrdinalFeature, series: &Series) -> Result<Vec<Option<f64>>> {
    let default = feature.default_rank() as f64;
    if !matches!(series.dtype(), DataType::String) {
        debug!(
            feature = %feature,
            dtype = %series.dtype(),
            "Non-text ordinal column, using default rank"
        );
        return Ok(vec![Some(default); series.len()]);
    }

    let encoded = series
        .str()?
        .into_iter()
        .map(|label| {
            if let Some(l) = label.filter(|l| feature.rank(l).is_none()) {
                debug!(feature = %feature, label = %l, "Unknown label, using default rank");
            }
            Some(feature.encode(label))
        })
        .collect();
    Ok(encoded)
}

/// Prepare a raw property table for bulk prediction
///
/// Never fails on unknown labels or missing data; those degrade to default
/// ranks, training medians or zero. The input frame is left untouched.
pub fn preprocess_inherited(raw: &DataFrame, schema: &SchemaReference) -> Result<FeatureMatrix> {
    align(raw, schema, true)
}

/// Align an already encoded table (such as the cleaned training data) to the schema
///
/// Every column is read as numeric, ordinal columns included. Gaps are filled
/// the same way as in [`preprocess_inherited`].
pub fn align_encoded(table: &DataFrame, schema: &SchemaReference) -> Result<FeatureMatrix> {
    align(table, schema, false)
}

fn align(
    raw: &DataFrame,
    schema: &SchemaReference,
    encode_ordinals: bool,
) -> Result<FeatureMatrix> {
    let n_rows = raw.height();

    let mut cells: HashMap<&str, Vec<Option<f64>>> = HashMap::with_capacity(raw.width());
    for col in raw.get_columns() {
        let name = col.name().as_str();
        if !schema.contains(name) {
            debug!(column = %name, "Dropping column outside the schema");
            continue;
        }

        let series = col.as_materialized_series();
        let column = match OrdinalFeature::from_column(name).filter(|_| encode_ordinals) {
            Some(feature) => ordinal_cells(feature, series)?,
            None => numeric_cells(series)?,
        };
        cells.insert(name, column);
    }

    let names = schema.feature_names();
    let mut values = Array2::<f64>::zeros((n_rows, names.len()));
    let mut imputed = 0usize;

    for (j, name) in names.iter().enumerate() {
        let column = cells.get(name.as_str());
        for i in 0..n_rows {
            let state = match column {
                None => CellState::Absent,
                Some(col) => col[i].map_or(CellState::Missing, CellState::Present),
            };
            let resolved = resolve(name, None, state, schema);
            if resolved.source == ValueSource::Median {
                imputed += 1;
            }
            values[[i, j]] = resolved.value;
        }
    }

    debug!(
        rows = n_rows,
        features = names.len(),
        absent = names.len() - cells.len(),
        imputed,
        "Aligned raw records to schema"
    );

    Ok(FeatureMatrix::from_parts(names.to_vec(), values))
}
