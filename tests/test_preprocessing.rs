//! Integration test: feature reconciliation against a derived schema

use houselytics::prelude::*;
use polars::prelude::*;
use std::collections::HashMap;

fn training_df() -> DataFrame {
    df!(
        "OverallQual" => &[5i64, 6, 7, 8, 4, 6],
        "GrLivArea" => &[1200.0, 1500.0, 1710.0, 2200.0, 900.0, 1460.0],
        "KitchenQual" => &[3i64, 3, 4, 5, 2, 3],
        "GarageArea" => &[Some(400.0), Some(460.0), None, Some(640.0), Some(0.0), Some(480.0)],
        "YearBuilt" => &[1961i64, 1976, 2001, 2007, 1915, 1993],
        "SalePrice" => &[129500.0, 181500.0, 223500.0, 307000.0, 86000.0, 175000.0],
    )
    .unwrap()
}

fn schema() -> SchemaReference {
    SchemaReference::from_training_frame(&training_df(), "SalePrice").unwrap()
}

#[test]
fn test_column_completeness() {
    let schema = schema();
    let inputs = [
        UserValues::new(),
        UserValues::new().with("GrLivArea", 3000.0),
        UserValues::new().with("NotAFeature", 1.0).with("YearBuilt", 2020.0),
    ];

    for user in &inputs {
        let frame = build_feature_frame(user, &schema);
        assert_eq!(frame.columns(), schema.feature_names());
        assert_eq!(frame.n_rows(), 1);
        assert!(frame.values().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_override_and_median_fallback() {
    let schema = schema();
    let user = UserValues::new().with("OverallQual", 10.0);
    let frame = build_feature_frame(&user, &schema);

    assert_eq!(frame.get(0, "OverallQual"), Some(10.0));
    assert_eq!(frame.get(0, "GrLivArea"), schema.median("GrLivArea"));
    assert_eq!(frame.get(0, "GarageArea"), Some(460.0));
}

#[test]
fn test_end_to_end_example() {
    let schema = SchemaReference::new(
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
    .unwrap();
    let user = UserValues::new().with("OverallQual", 9.0).with("GrLivArea", 2500.0);

    let frame = build_feature_frame(&user, &schema);
    let df = frame.to_dataframe().unwrap();

    let expected = df!(
        "OverallQual" => &[9.0],
        "GrLivArea" => &[2500.0],
        "GarageArea" => &[400.0],
        "YearBuilt" => &[2000.0],
    )
    .unwrap();
    assert!(df.equals(&expected));
}

#[test]
fn test_inherited_alignment_matches_schema() {
    let schema = schema();
    let raw = df!(
        "Id" => &[1461i64, 1462, 1463, 1464],
        "OverallQual" => &[5i64, 6, 5, 6],
        "GrLivArea" => &[Some(896.0), Some(1329.0), None, Some(1604.0)],
        "KitchenQual" => &[Some("TA"), Some("Gd"), Some("XYZ"), None],
        "Street" => &["Pave", "Pave", "Pave", "Pave"],
    )
    .unwrap();

    let out = preprocess_inherited(&raw, &schema).unwrap();
    assert_eq!(out.n_rows(), 4);
    assert_eq!(out.columns(), schema.feature_names());

    assert_eq!(out.column("KitchenQual").unwrap().to_vec(), vec![3.0, 4.0, 3.0, 3.0]);
    assert_eq!(out.get(2, "GrLivArea"), schema.median("GrLivArea"));
    // absent from the raw table entirely
    assert_eq!(out.column("GarageArea").unwrap().to_vec(), vec![0.0; 4]);
    assert_eq!(out.column("YearBuilt").unwrap().to_vec(), vec![0.0; 4]);
}

#[test]
fn test_inherited_is_idempotent() {
    let schema = schema();
    let raw = df!(
        "GrLivArea" => &[Some(896.0), None],
        "KitchenQual" => &[Some("Ex"), Some("Po")],
    )
    .unwrap();

    let first = preprocess_inherited(&raw, &schema).unwrap();
    let second = preprocess_inherited(&raw, &schema).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_target_is_rejected() {
    let df = training_df().drop("SalePrice").unwrap();
    let err = SchemaReference::from_training_frame(&df, "SalePrice").unwrap_err();
    assert!(matches!(err, HouselyticsError::SchemaError(_)));
}
