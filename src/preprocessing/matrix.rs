//! Schema-aligned feature matrix handed to the model

use crate::error::{HouselyticsError, Result};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fully populated numeric table whose columns follow the schema order
///
/// Built once per prediction request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Assemble from parts already known to agree in width
    pub(crate) fn from_parts(columns: Vec<String>, values: Array2<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.ncols());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.n_rows()).then(|| self.values.row(index))
    }

    /// Column view by feature name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|j| self.values.column(j))
    }

    /// Single cell by row index and feature name
    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|col| col.get(row).copied())
    }

    /// Convert to a polars frame with one Float64 column per feature
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let values: Vec<f64> = self.values.column(j).to_vec();
                Column::new(name.as_str().into(), values)
            })
            .collect();

        DataFrame::new(columns).map_err(|e| HouselyticsError::DataError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix() -> FeatureMatrix {
        FeatureMatrix::from_parts(
            vec!["OverallQual".to_string(), "GrLivArea".to_string()],
            array![[7.0, 1710.0], [6.0, 1262.0]],
        )
    }

    #[test]
    fn test_lookup_by_name() {
        let m = matrix();
        assert_eq!(m.get(1, "GrLivArea"), Some(1262.0));
        assert_eq!(m.get(2, "GrLivArea"), None);
        assert_eq!(m.get(0, "LotArea"), None);
    }

    #[test]
    fn test_to_dataframe_keeps_order() {
        let df = matrix().to_dataframe().unwrap();
        assert_eq!(df.get_column_names_str(), vec!["OverallQual", "GrLivArea"]);
        assert_eq!(df.height(), 2);
    }
}
