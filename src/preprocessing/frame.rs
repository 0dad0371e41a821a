//! Feature frame builder: one complete feature row from sparse user input

use super::matrix::FeatureMatrix;
use super::resolve::{resolve, CellState, ValueSource};
use crate::schema::SchemaReference;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Sparse feature name → value mapping supplied by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserValues(BTreeMap<String, f64>);

impl UserValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of keys that name a schema feature
    pub fn matched(&self, schema: &SchemaReference) -> usize {
        self.0.keys().filter(|k| schema.contains(k)).count()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for UserValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Build exactly one feature row aligned to `schema`
///
/// Every feature starts from its training median (or zero when it has none)
/// and is overwritten by the user's value when one is supplied. Keys that are
/// not in the schema are ignored.
pub fn build_feature_frame(user_values: &UserValues, schema: &SchemaReference) -> FeatureMatrix {
    for (key, _) in user_values.iter().filter(|(k, _)| !schema.contains(k)) {
        debug!(feature = %key, "Ignoring user value outside the schema");
    }

    let names = schema.feature_names();
    let mut values = Array2::<f64>::zeros((1, names.len()));
    let mut from_user = 0usize;

    for (j, name) in names.iter().enumerate() {
        // no raw record here, so every feature is eligible for its median
        let resolved = resolve(name, user_values.get(name), CellState::Missing, schema);
        if resolved.source == ValueSource::User {
            from_user += 1;
        }
        values[[0, j]] = resolved.value;
    }

    debug!(
        features = names.len(),
        from_user,
        "Built feature frame"
    );

    // columns always come from the schema, so the shapes agree
    FeatureMatrix::from_parts(names.to_vec(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn schema() -> SchemaReference {
        SchemaReference::new(
            vec![
                "OverallQual".to_string(),
                "GrLivArea".to_string(),
                "GarageArea".to_string(),
                "YearBuilt".to_string(),
            ],
            HashMap::from([
                ("OverallQual".to_string(), 5.0),
                ("GrLivArea".to_string(), 1500.0),
                ("GarageArea".to_string(), 400.0),
                ("YearBuilt".to_string(), 2000.0),
            ]),
            "SalePrice",
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let user = UserValues::new()
            .with("OverallQual", 9.0)
            .with("GrLivArea", 2500.0);
        let frame = build_feature_frame(&user, &schema());

        assert_eq!(frame.n_rows(), 1);
        assert_eq!(
            frame.columns(),
            &["OverallQual", "GrLivArea", "GarageArea", "YearBuilt"]
        );
        assert_eq!(frame.row(0).unwrap().to_vec(), vec![9.0, 2500.0, 400.0, 2000.0]);
    }

    #[test]
    fn test_empty_user_values_gives_medians() {
        let frame = build_feature_frame(&UserValues::new(), &schema());
        assert_eq!(frame.row(0).unwrap().to_vec(), vec![5.0, 1500.0, 400.0, 2000.0]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let user = UserValues::new().with("PoolQC", 4.0).with("YearBuilt", 1975.0);
        let frame = build_feature_frame(&user, &schema());
        assert_eq!(frame.n_cols(), 4);
        assert_eq!(frame.get(0, "YearBuilt"), Some(1975.0));
        assert_eq!(frame.get(0, "PoolQC"), None);
        assert_eq!(user.matched(&schema()), 1);
    }

    #[test]
    fn test_zero_fallback_without_median() {
        let schema = SchemaReference::new(
            vec!["LotArea".to_string(), "Fireplaces".to_string()],
            HashMap::from([("LotArea".to_string(), 9478.5)]),
            "SalePrice",
        )
        .unwrap();
        let frame = build_feature_frame(&UserValues::new(), &schema);
        assert_eq!(frame.get(0, "LotArea"), Some(9478.5));
        assert_eq!(frame.get(0, "Fireplaces"), Some(0.0));
    }

    #[test]
    fn test_empty_schema_gives_empty_row() {
        let schema = SchemaReference::new(Vec::new(), HashMap::new(), "SalePrice").unwrap();
        let frame = build_feature_frame(&UserValues::new().with("OverallQual", 7.0), &schema);
        assert_eq!(frame.n_rows(), 1);
        assert_eq!(frame.n_cols(), 0);
    }

    #[test]
    fn test_nan_user_value_becomes_zero() {
        let user = UserValues::new().with("GarageArea", f64::NAN);
        let frame = build_feature_frame(&user, &schema());
        assert_eq!(frame.get(0, "GarageArea"), Some(0.0));
    }

    #[test]
    fn test_from_iterator() {
        let user: UserValues = [("OverallQual", 8.0), ("LotArea", 10000.0)].into_iter().collect();
        assert_eq!(user.len(), 2);
        assert_eq!(user.get("LotArea"), Some(10000.0));
    }
}
