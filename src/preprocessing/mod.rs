//! Feature reconciliation
//!
//! Maps partial user input and raw property tables onto the exact feature
//! layout a trained model expects:
//! - Ordinal encoding of the recognized categorical columns
//! - Median imputation from the training schema
//! - Column alignment to the schema order
//!
//! Both entry points, [`build_feature_frame`] and [`preprocess_inherited`],
//! resolve each feature through the same precedence chain in [`resolve`].

mod batch;
mod encoding;
mod frame;
mod matrix;
pub mod resolve;

pub use batch::{align_encoded, preprocess_inherited};
pub use encoding::OrdinalFeature;
pub use frame::{build_feature_frame, UserValues};
pub use matrix::FeatureMatrix;
pub use resolve::{CellState, Resolved, ValueSource};
