//! Houselytics - property valuation core
//!
//! Turns partial property descriptions into the exact feature layout a
//! pre-trained house price model expects, and scores them.
//!
//! # Modules
//!
//! ## Feature reconciliation
//! - [`schema`] - Ordered feature names and training medians
//! - [`preprocessing`] - Feature frame builder, batch preprocessor, ordinal encoding
//!
//! ## Valuation
//! - [`model`] - Price model contract and the linear model artifact
//! - [`valuation`] - Once-built valuation context, estimates and portfolio appraisal
//!
//! ## Reports
//! - [`evaluation`] - R², MAE, RMSE on a seeded hold-out split
//! - [`insights`] - Correlation of attributes with sale price
//!
//! ## Services
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod config;

// Feature reconciliation
pub mod schema;
pub mod preprocessing;

// Valuation
pub mod model;
pub mod valuation;

// Reports
pub mod evaluation;
pub mod insights;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{HouselyticsError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ValuationConfig;
    pub use crate::error::{HouselyticsError, Result};

    pub use crate::schema::SchemaReference;
    pub use crate::preprocessing::{
        build_feature_frame, preprocess_inherited, FeatureMatrix, OrdinalFeature, UserValues,
        ValueSource,
    };

    pub use crate::model::{FeatureImportances, LinearPriceModel, ModelMetadata, PriceModel};
    pub use crate::valuation::{
        Estimate, PortfolioAppraisal, PropertyPreset, QualityTier, ValuationContext,
    };

    pub use crate::evaluation::{evaluate, EvaluationReport};
    pub use crate::insights::{
        check_hypotheses, top_correlations, Correlation, CorrelationStrength, HypothesisCheck,
    };

    pub use crate::utils::{DataLoader, DataSaver};
}
