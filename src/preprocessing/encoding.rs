//! Ordinal encoding tables for the recognized categorical columns
//!
//! The label → rank tables are fixed at training time. Encoding is total: any
//! label outside a table, including a missing cell, yields the column's
//! default rank.

use serde::{Deserialize, Serialize};
use std::fmt;

const BSMT_EXPOSURE: &[(&str, i64)] = &[("No", 0), ("Mn", 1), ("Av", 2), ("Gd", 3)];
const BSMT_FIN_TYPE: &[(&str, i64)] = &[
    ("Unf", 0),
    ("LwQ", 1),
    ("Rec", 2),
    ("BLQ", 3),
    ("ALQ", 4),
    ("GLQ", 5),
];
const GARAGE_FINISH: &[(&str, i64)] = &[("Unf", 0), ("RFn", 1), ("Fin", 2)];
const KITCHEN_QUAL: &[(&str, i64)] = &[("Po", 1), ("Fa", 2), ("TA", 3), ("Gd", 4), ("Ex", 5)];

/// Ordinal categorical columns the batch preprocessor knows how to encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrdinalFeature {
    BsmtExposure,
    BsmtFinType1,
    GarageFinish,
    KitchenQual,
}

impl OrdinalFeature {
    pub const ALL: [OrdinalFeature; 4] = [
        OrdinalFeature::BsmtExposure,
        OrdinalFeature::BsmtFinType1,
        OrdinalFeature::GarageFinish,
        OrdinalFeature::KitchenQual,
    ];

    /// Column name in raw and training tables
    pub fn column(self) -> &'static str {
        match self {
            OrdinalFeature::BsmtExposure => "BsmtExposure",
            OrdinalFeature::BsmtFinType1 => "BsmtFinType1",
            OrdinalFeature::GarageFinish => "GarageFinish",
            OrdinalFeature::KitchenQual => "KitchenQual",
        }
    }

    /// Look up the feature for a column name
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Known labels and their ranks, lowest rank first
    pub fn table(self) -> &'static [(&'static str, i64)] {
        match self {
            OrdinalFeature::BsmtExposure => BSMT_EXPOSURE,
            OrdinalFeature::BsmtFinType1 => BSMT_FIN_TYPE,
            OrdinalFeature::GarageFinish => GARAGE_FINISH,
            OrdinalFeature::KitchenQual => KITCHEN_QUAL,
        }
    }

    /// Rank used for unknown or missing labels
    ///
    /// Kitchen quality defaults to "TA" (typical/average) rather than the bottom
    /// of its scale.
    pub fn default_rank(self) -> i64 {
        match self {
            OrdinalFeature::KitchenQual => 3,
            _ => 0,
        }
    }

    /// Rank for a known label; matching is exact, whitespace included
    pub fn rank(self, label: &str) -> Option<i64> {
        self.table()
            .iter()
            .find(|(known, _)| *known == label)
            .map(|&(_, rank)| rank)
    }

    /// Encode a cell, falling back to the default rank
    pub fn encode(self, label: Option<&str>) -> f64 {
        label
            .and_then(|l| self.rank(l))
            .unwrap_or_else(|| self.default_rank()) as f64
    }
}

impl fmt::Display for OrdinalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
