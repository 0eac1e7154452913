// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::sync::Arc;

use the_featurewood::config::load_and_validate_config;
use the_featurewood::engine::FittedState;
use the_featurewood::errors::{ExecutionError, ValidationError};
use the_featurewood::features::{register_taxi_features, CategoryIndexer, Standardizer};
use the_featurewood::{Column, FeatureInputs, Generator, Registry, Table, Tags};

fn taxi_registry() -> Arc<Registry> {
    let mut registry = Registry::new("taxi_nyc");
    register_taxi_features(&mut registry).unwrap();
    registry
        .register_stateful("vendor_index", &[], CategoryIndexer::on_raw("vendor_id"))
        .unwrap();
    registry
        .register_stateful(
            "pickup_hour_scaled",
            &["pickup_hour"],
            Standardizer::on_feature("pickup_hour"),
        )
        .unwrap();
    Arc::new(registry)
}

fn trips(pickups: &[&str], vendors: &[&str]) -> Table {
    Table::with_default_index(pickups.len())
        .with_column(
            "pickup_datetime",
            Column::Str(pickups.iter().map(|p| Some(p.to_string())).collect()),
        )
        .unwrap()
        .with_column(
            "vendor_id",
            Column::Str(vendors.iter().map(|v| Some(v.to_string())).collect()),
        )
        .unwrap()
}

#[tokio::test]
async fn test_hour_and_weekday_are_in_range() {
    let mut generator = Generator::new(taxi_registry(), &["pickup_hour", "pickup_weekday"]).unwrap();
    let pickups = [
        "2016-03-14 17:24:55",
        "2016-06-12 00:43:35",
        "2016-01-19 11:35:24",
        "2016-04-06 19:32:31",
        "2016-03-26 13:30:55",
        "bad timestamp",
    ];
    let vendors = ["2", "1", "2", "2", "2", "1"];

    let features = generator
        .fit_transform(trips(&pickups, &vendors), Tags::from([("dataset", "train")]))
        .await
        .unwrap();

    let table = features.table();
    assert_eq!(table.column_names(), &["pickup_hour", "pickup_weekday"]);
    assert_eq!(table.num_rows(), pickups.len());

    let hours = table.column("pickup_hour").unwrap().as_int("pickup_hour").unwrap();
    let weekdays = table.column("pickup_weekday").unwrap().as_int("pickup_weekday").unwrap();
    for (hour, weekday) in hours.iter().zip(weekdays).take(5) {
        assert!((0..=23).contains(&hour.unwrap()));
        assert!((0..=6).contains(&weekday.unwrap()));
    }
    assert_eq!(hours[5], None);
    assert_eq!(weekdays[5], None);
    assert_eq!(
        features.provenance().resolved_order,
        vec!["pickup_time", "pickup_hour", "pickup_weekday"]
    );
}

#[tokio::test]
async fn test_train_then_test_split() {
    let mut generator = Generator::new(
        taxi_registry(),
        &["vendor_index", "pickup_hour_scaled", "pickup_weekday"],
    )
    .unwrap();

    let train = trips(
        &["2016-03-14 10:00:00", "2016-03-15 12:00:00", "2016-03-16 14:00:00"],
        &["2", "1", "2"],
    );
    let fitted = generator
        .fit_transform(train, Tags::from([("dataset", "train")]))
        .await
        .unwrap();
    assert_eq!(
        fitted.column("vendor_index"),
        Some(&Column::Int(vec![Some(1), Some(0), Some(1)]))
    );
    let mut fitted_names = fitted.provenance().fitted.clone();
    fitted_names.sort();
    assert_eq!(fitted_names, vec!["pickup_hour_scaled", "vendor_index"]);

    let test = trips(&["2016-03-17 12:00:00", "2016-03-18 16:00:00"], &["1", "3"]);
    let transformed = generator
        .transform(test, Tags::from([("dataset", "test")]))
        .await
        .unwrap();

    assert_eq!(
        transformed.column("vendor_index"),
        Some(&Column::Int(vec![Some(0), None]))
    );
    let scaled = transformed
        .column("pickup_hour_scaled")
        .unwrap()
        .as_float("pickup_hour_scaled")
        .unwrap();
    // train hours 10, 12, 14: mean 12
    assert_eq!(scaled[0], Some(0.0));
    assert!(scaled[1].unwrap() > 0.0);
}

#[tokio::test]
async fn test_transform_requires_fit() {
    let generator = Generator::new(taxi_registry(), &["pickup_hour", "vendor_index"]).unwrap();
    let err = generator
        .transform(trips(&["2016-03-14 10:00:00"], &["1"]), Tags::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutionError::NotFitted { feature } if feature == "vendor_index"));
}

#[tokio::test]
async fn test_persisted_state_reproduces_transform() {
    let features = ["vendor_index", "pickup_hour_scaled"];
    let mut trained = Generator::new(taxi_registry(), &features).unwrap();
    trained
        .fit_transform(
            trips(&["2016-03-14 01:00:00", "2016-03-14 05:00:00"], &["a", "b"]),
            Tags::new(),
        )
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fitted.json");
    std::fs::write(&path, trained.fitted_state().to_json().unwrap()).unwrap();

    let restored_state = FittedState::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let restored = Generator::new(taxi_registry(), &features)
        .unwrap()
        .with_fitted_state(restored_state);
    assert!(restored.is_fitted());

    let test = Arc::new(trips(&["2016-03-20 03:00:00", "2016-03-21 09:00:00"], &["b", "z"]));
    let expected = trained.transform(Arc::clone(&test), Tags::new()).await.unwrap();
    let actual = restored.transform(test, Tags::new()).await.unwrap();
    assert_eq!(expected.table(), actual.table());
}

#[tokio::test]
async fn test_generator_from_yaml_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "features: [pickup_weekday, pickup_hour]\nstrategy: level\nexecutor_options:\n  max_concurrency: 2\n"
    )
    .unwrap();

    let cfg = load_and_validate_config(file.path()).unwrap();
    let mut generator = Generator::from_config(taxi_registry(), &cfg).unwrap();
    let features = generator
        .fit_transform(trips(&["2016-03-20 22:15:00"], &["1"]), Tags::new())
        .await
        .unwrap();

    assert_eq!(features.table().column_names(), &["pickup_weekday", "pickup_hour"]);
    assert_eq!(features.column("pickup_weekday"), Some(&Column::Int(vec![Some(6)])));
    assert_eq!(features.column("pickup_hour"), Some(&Column::Int(vec![Some(22)])));
}

fn constant(inputs: &FeatureInputs<'_>) -> anyhow::Result<Column> {
    Ok(Column::Int(vec![None; inputs.num_rows()]))
}

#[test]
fn test_cycle_is_reported_at_construction() {
    let mut registry = Registry::new("broken");
    registry.register("a", &["b"], constant).unwrap();
    registry.register("b", &["a"], constant).unwrap();

    let err = Generator::new(Arc::new(registry), &["a"]).unwrap_err();
    assert_eq!(
        err,
        ValidationError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()]
        }
    );
}

#[tokio::test]
async fn test_fresh_generators_agree() {
    let data = Arc::new(trips(
        &["2016-05-01 06:00:00", "2016-05-02 18:30:00", "2016-05-03 23:10:00"],
        &["2", "1", "2"],
    ));
    let features = ["pickup_hour_scaled", "vendor_index", "pickup_weekday"];

    let mut tables = Vec::new();
    for _ in 0..3 {
        let mut generator = Generator::new(taxi_registry(), &features).unwrap();
        let result = generator
            .fit_transform(Arc::clone(&data), Tags::new())
            .await
            .unwrap();
        tables.push(result.into_table());
    }

    assert_eq!(tables[0], tables[1]);
    assert_eq!(tables[1], tables[2]);
}
