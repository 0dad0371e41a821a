//! Source precedence for a single feature value
//!
//! Every declared feature is resolved through one ordered chain:
//! user value, then raw record cell, then training median, then zero.

use crate::schema::SchemaReference;
use serde::{Deserialize, Serialize};

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueSource {
    User,
    Record,
    Median,
    Zero,
}

/// State of a raw record cell for one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellState {
    /// The raw table has no such column
    Absent,
    /// The column exists but this cell is null or unparseable
    Missing,
    Present(f64),
}

/// A resolved feature value and its source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub value: f64,
    pub source: ValueSource,
}

impl Resolved {
    fn new(value: f64, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Resolve one feature value
///
/// A user value that is not finite is treated as a null overwrite and
/// resolves to zero. An absent column resolves to zero without consulting the
/// median; only a missing cell in a present column is median-imputed.
pub fn resolve(
    name: &str,
    user: Option<f64>,
    record: CellState,
    schema: &SchemaReference,
) -> Resolved {
    if let Some(v) = user {
        return if v.is_finite() {
            Resolved::new(v, ValueSource::User)
        } else {
            Resolved::new(0.0, ValueSource::Zero)
        };
    }

    match record {
        CellState::Present(v) if v.is_finite() => Resolved::new(v, ValueSource::Record),
        CellState::Absent => Resolved::new(0.0, ValueSource::Zero),
        CellState::Present(_) | CellState::Missing => match schema.median(name) {
            Some(m) if m.is_finite() => Resolved::new(m, ValueSource::Median),
            _ => Resolved::new(0.0, ValueSource::Zero),
        },
    }
}
