//! Relationships between property attributes and sale price

use crate::error::{HouselyticsError, Result};
use crate::schema::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Qualitative strength of a positive relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    /// Strong above 0.70, moderate above 0.30, weak otherwise
    pub fn classify(r: f64) -> Self {
        if r > 0.70 {
            CorrelationStrength::Strong
        } else if r > 0.30 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
        };
        f.write_str(s)
    }
}

/// Pearson correlation of one feature with the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub feature: String,
    pub r: f64,
}

impl Correlation {
    pub fn strength(&self) -> CorrelationStrength {
        CorrelationStrength::classify(self.r)
    }
}

fn as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)
        .map_err(|_| HouselyticsError::FeatureNotFound(name.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Pearson r over pairwise-complete observations
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Correlation between `feature` and `target`; `None` when either is constant
pub fn correlation(df: &DataFrame, feature: &str, target: &str) -> Result<Option<f64>> {
    let x = as_f64(df, feature)?;
    let y = as_f64(df, target)?;
    Ok(pearson(&x, &y))
}

/// A claim that a feature rises with sale price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hypothesis {
    pub feature: &'static str,
    pub statement: &'static str,
}

/// The standing price hypotheses checked against the training data
pub const HYPOTHESES: [Hypothesis; 3] = [
    Hypothesis {
        feature: "OverallQual",
        statement: "Houses with higher construction quality sell for more",
    },
    Hypothesis {
        feature: "GrLivArea",
        statement: "Sale price rises with above-ground living area",
    },
    Hypothesis {
        feature: "YearBuilt",
        statement: "Newer houses sell for more than older ones",
    },
];

/// Outcome of checking one hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisCheck {
    pub hypothesis: Hypothesis,
    /// `None` when the column is missing or constant
    pub r: Option<f64>,
}

impl HypothesisCheck {
    pub fn strength(&self) -> Option<CorrelationStrength> {
        self.r.map(CorrelationStrength::classify)
    }

    /// Moderate or strong positive correlation
    pub fn is_supported(&self) -> bool {
        matches!(
            self.strength(),
            Some(CorrelationStrength::Strong | CorrelationStrength::Moderate)
        )
    }
}

/// Check every standing hypothesis; a missing feature column is reported, not an error
pub fn check_hypotheses(df: &DataFrame, target: &str) -> Result<Vec<HypothesisCheck>> {
    if df.column(target).is_err() {
        return Err(HouselyticsError::FeatureNotFound(target.to_string()));
    }

    HYPOTHESES
        .iter()
        .map(|&hypothesis| -> Result<HypothesisCheck> {
            let r = if df.column(hypothesis.feature).is_ok() {
                correlation(df, hypothesis.feature, target)?
            } else {
                debug!(feature = hypothesis.feature, "Column missing, hypothesis not tested");
                None
            };
            Ok(HypothesisCheck { hypothesis, r })
        })
        .collect()
}

/// The `n` numeric features most correlated with `target`, by absolute value
pub fn top_correlations(df: &DataFrame, target: &str, n: usize) -> Result<Vec<Correlation>> {
    let y = as_f64(df, target)?;

    let mut correlations = Vec::new();
    for col in df.get_columns() {
        let name = col.name().as_str();
        if name == target || !is_numeric_dtype(col.dtype()) {
            continue;
        }
        if let Some(r) = pearson(&as_f64(df, name)?, &y) {
            correlations.push(Correlation {
                feature: name.to_string(),
                r,
            });
        }
    }

    correlations.sort_by(|a, b| {
        b.r.abs()
            .partial_cmp(&a.r.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    correlations.truncate(n);
    Ok(correlations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn houses() -> DataFrame {
        df!(
            "OverallQual" => &[4i64, 5, 6, 7, 8],
            "YrSold" => &[2008i64, 2007, 2009, 2006, 2008],
            "Age" => &[60.0, 45.0, 30.0, 15.0, 5.0],
            "Street" => &["Pave", "Pave", "Grvl", "Pave", "Pave"],
            "SalePrice" => &[100000.0, 130000.0, 160000.0, 190000.0, 220000.0],
        )
        .unwrap()
    }

    #[test]
    fn test_perfect_correlation() {
        let r = correlation(&houses(), "OverallQual", "SalePrice").unwrap().unwrap();
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_feature_has_no_correlation() {
        let df = df!("Flat" => &[1.0, 1.0, 1.0], "SalePrice" => &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(correlation(&df, "Flat", "SalePrice").unwrap(), None);
    }

    #[test]
    fn test_missing_feature() {
        let err = correlation(&houses(), "PoolArea", "SalePrice").unwrap_err();
        assert!(matches!(err, HouselyticsError::FeatureNotFound(_)));
    }

    #[test]
    fn test_top_correlations_sorted_by_magnitude() {
        let top = top_correlations(&houses(), "SalePrice", 2).unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|c| c.feature != "SalePrice" && c.feature != "Street"));
        assert!(top[0].r.abs() >= top[1].r.abs());
        assert_eq!(top[0].feature, "OverallQual");
        assert_eq!(top[1].feature, "Age");
        assert!(top[1].r < 0.0);
    }

    #[test]
    fn test_hypotheses() {
        let df = df!(
            "OverallQual" => &[4i64, 5, 6, 7, 8],
            "YearBuilt" => &[1990i64, 1950, 2005, 1960, 1980],
            "SalePrice" => &[100000.0, 130000.0, 160000.0, 190000.0, 220000.0],
        )
        .unwrap();
        let checks = check_hypotheses(&df, "SalePrice").unwrap();
        assert_eq!(checks.len(), 3);

        assert_eq!(checks[0].hypothesis.feature, "OverallQual");
        assert_eq!(checks[0].strength(), Some(CorrelationStrength::Strong));
        assert!(checks[0].is_supported());

        // GrLivArea is absent
        assert_eq!(checks[1].r, None);
        assert!(!checks[1].is_supported());

        assert_eq!(checks[2].strength(), Some(CorrelationStrength::Weak));
        assert!(!checks[2].is_supported());
    }

    #[test]
    fn test_hypotheses_need_target() {
        let err = check_hypotheses(&houses(), "Price").unwrap_err();
        assert!(matches!(err, HouselyticsError::FeatureNotFound(_)));
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(CorrelationStrength::classify(0.79), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::classify(0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::classify(0.30), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::classify(-0.9), CorrelationStrength::Weak);
    }
}
