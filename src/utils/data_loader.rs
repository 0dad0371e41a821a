//! CSV loading and saving for training, inherited and annotated tables

use crate::error::{HouselyticsError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Cell tokens read as missing, matching the pandas `read_csv` defaults
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Loader for the flat tables the valuation core consumes
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows scanned when inferring column dtypes
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
        }
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HouselyticsError::DataError(format!("{}: {}", path.display(), e))
        })?;

        let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|&t| t.into()).collect());
        let parse_opts = CsvParseOptions::default().with_null_values(Some(null_values));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| HouselyticsError::DataError(e.to_string()))?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            "Loaded table"
        );
        Ok(df)
    }
}

/// Writer for annotated output tables
#[derive(Debug, Clone, Default)]
pub struct DataSaver;

impl DataSaver {
    pub fn new() -> Self {
        Self
    }

    /// Write a frame to CSV with a header row
    pub fn save_csv(&self, df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path.as_ref())?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| HouselyticsError::DataError(e.to_string()))?;
        Ok(())
    }
}
