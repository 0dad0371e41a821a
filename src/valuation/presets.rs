//! Input presets for the quick and detailed estimate forms

use crate::error::{HouselyticsError, Result};
use crate::preprocessing::UserValues;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Construction quality choices on the quick estimate form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Basic,
    Standard,
    Good,
    Premium,
}

impl QualityTier {
    /// `OverallQual` score for this tier
    pub fn overall_qual(self) -> f64 {
        match self {
            QualityTier::Basic => 3.0,
            QualityTier::Standard => 5.0,
            QualityTier::Good => 7.0,
            QualityTier::Premium => 9.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Basic => "Basic (Low)",
            QualityTier::Standard => "Standard (Average)",
            QualityTier::Good => "Good (Above Average)",
            QualityTier::Premium => "Premium (High)",
        }
    }
}

impl FromStr for QualityTier {
    type Err = HouselyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "low" => Ok(QualityTier::Basic),
            "standard" | "average" => Ok(QualityTier::Standard),
            "good" => Ok(QualityTier::Good),
            "premium" | "high" => Ok(QualityTier::Premium),
            other => Err(HouselyticsError::InvalidInput(format!(
                "unknown quality tier '{}'",
                other
            ))),
        }
    }
}

/// Which attributes a form collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyPreset {
    /// High-impact features only
    Quick,
    Detailed,
}

const QUICK_FIELDS: &[&str] = &["OverallQual", "GrLivArea", "GarageArea", "YearBuilt"];
const DETAILED_FIELDS: &[&str] = &[
    "OverallQual",
    "OverallCond",
    "YearBuilt",
    "YearRemodAdd",
    "GrLivArea",
    "BedroomAbvGr",
    "LotArea",
    "TotalBsmtSF",
    "GarageArea",
];

impl PropertyPreset {
    /// Feature names the form collects
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            PropertyPreset::Quick => QUICK_FIELDS,
            PropertyPreset::Detailed => DETAILED_FIELDS,
        }
    }

    /// Keep only the values this form would have collected
    pub fn select(self, values: &UserValues) -> UserValues {
        self.fields()
            .iter()
            .filter_map(|&f| values.get(f).map(|v| (f, v)))
            .collect()
    }

    /// Quick form values: quality tier, living area, garage size, build year
    pub fn quick(tier: QualityTier, gr_liv_area: f64, garage_area: f64, year_built: f64) -> UserValues {
        UserValues::new()
            .with("OverallQual", tier.overall_qual())
            .with("GrLivArea", gr_liv_area)
            .with("GarageArea", garage_area)
            .with("YearBuilt", year_built)
    }
}

impl FromStr for PropertyPreset {
    type Err = HouselyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(PropertyPreset::Quick),
            "detailed" => Ok(PropertyPreset::Detailed),
            other => Err(HouselyticsError::InvalidInput(format!(
                "unknown preset '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_tiers() {
        assert_eq!(QualityTier::Premium.overall_qual(), 9.0);
        assert_eq!("standard".parse::<QualityTier>().unwrap(), QualityTier::Standard);
        assert!("excellent".parse::<QualityTier>().is_err());
        assert_eq!(QualityTier::Good.label(), "Good (Above Average)");
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Quick".parse::<PropertyPreset>().unwrap(), PropertyPreset::Quick);
        assert_eq!("detailed".parse::<PropertyPreset>().unwrap(), PropertyPreset::Detailed);
        assert!("full".parse::<PropertyPreset>().is_err());
    }

    #[test]
    fn test_quick_values() {
        let values = PropertyPreset::quick(QualityTier::Good, 1500.0, 400.0, 2000.0);
        assert_eq!(values.len(), 4);
        assert_eq!(values.get("OverallQual"), Some(7.0));
    }

    #[test]
    fn test_select_filters_to_form_fields() {
        let values = UserValues::new()
            .with("OverallQual", 6.0)
            .with("LotArea", 9000.0)
            .with("PoolArea", 0.0);
        let quick = PropertyPreset::Quick.select(&values);
        assert_eq!(quick.len(), 1);
        let detailed = PropertyPreset::Detailed.select(&values);
        assert_eq!(detailed.len(), 2);
    }
}
