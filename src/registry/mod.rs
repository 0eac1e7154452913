// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Feature registry: the catalog of named feature definitions.
//!
//! A registry is built once per feature catalog, populated through explicit
//! registration calls, and then handed to generators behind an `Arc`, after
//! which nothing can mutate it.
//!
//! ```rust
//! use the_featurewood::{Column, Registry};
//!
//! let mut registry = Registry::new("taxi_nyc");
//! registry
//!     .register("trip_distance_km", &[], |inputs| {
//!         let miles = inputs.raw("trip_distance")?.to_f64("trip_distance")?;
//!         Ok(Column::Float(miles.iter().map(|m| m.map(|m| m * 1.609_344)).collect()))
//!     })
//!     .unwrap();
//!
//! assert!(registry.contains("trip_distance_km"));
//! ```

mod definition;
mod validation;

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ValidationError;
use crate::frame::Column;
use crate::observability::messages::registry::FeatureRegistered;
use crate::observability::messages::StructuredLog;

pub use definition::{ComputeFn, Estimator, FeatureDefinition, FeatureInputs};
pub(crate) use definition::Compute;
pub(crate) use validation::resolve_closure;
pub use validation::validate_registry;

/// Named catalog of feature definitions, in registration order.
pub struct Registry {
    name: String,
    definitions: Vec<FeatureDefinition>,
    positions: HashMap<String, usize>,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Catalog name, e.g. `taxi_nyc`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a stateless feature.
    ///
    /// Dependencies do not need to be registered yet; they are checked when a
    /// generator resolves a request that reaches this feature.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        dependencies: &[&str],
        compute: F,
    ) -> Result<(), ValidationError>
    where
        F: Fn(&FeatureInputs<'_>) -> anyhow::Result<Column> + Send + Sync + 'static,
    {
        self.insert(name.into(), dependencies, Compute::Stateless(Arc::new(compute)))
    }

    /// Register a feature that learns parameters during a fit.
    pub fn register_stateful<E: Estimator>(
        &mut self,
        name: impl Into<String>,
        dependencies: &[&str],
        estimator: E,
    ) -> Result<(), ValidationError> {
        self.insert(name.into(), dependencies, Compute::Stateful(Arc::new(estimator)))
    }

    fn insert(
        &mut self,
        name: String,
        dependencies: &[&str],
        compute: Compute,
    ) -> Result<(), ValidationError> {
        if self.positions.contains_key(&name) {
            return Err(ValidationError::DuplicateName { name });
        }

        let position = self.definitions.len();
        let definition = FeatureDefinition::new(name.clone(), dependencies, compute, position);

        FeatureRegistered {
            registry: &self.name,
            feature: &name,
            dependencies: definition.dependencies(),
            stateful: definition.is_stateful(),
        }
        .log();

        self.positions.insert(name, position);
        self.definitions.push(definition);
        Ok(())
    }

    /// Look up a definition by name
    pub fn lookup(&self, name: &str) -> Result<&FeatureDefinition, ValidationError> {
        self.get(name).ok_or_else(|| ValidationError::UnknownFeature {
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&FeatureDefinition> {
        self.positions.get(name).map(|&position| &self.definitions[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Registration index of a feature
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Feature names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name())
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.definitions.iter()
    }

    /// Check every definition for unknown dependencies and cycles
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_registry(self)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("feature_count", &self.definitions.len())
            .field("features", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Table;

    fn constant(inputs: &FeatureInputs<'_>) -> anyhow::Result<Column> {
        Ok(Column::Int(vec![Some(1); inputs.num_rows()]))
    }

    struct MeanOf;

    impl Estimator for MeanOf {
        type Params = f64;

        fn fit(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<f64> {
            let values = inputs.raw("x")?.to_f64("x")?;
            let present: Vec<f64> = values.into_iter().flatten().collect();
            Ok(present.iter().sum::<f64>() / present.len().max(1) as f64)
        }

        fn apply(&self, inputs: &FeatureInputs<'_>, mean: &f64) -> anyhow::Result<Column> {
            Ok(Column::Float(vec![Some(*mean); inputs.num_rows()]))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new("test");
        registry.register("a", &[], constant).unwrap();
        registry.register("b", &["a", "a"], constant).unwrap();

        let b = registry.lookup("b").unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(b.dependencies(), &["a".to_string()]);
        assert_eq!(b.position(), 1);
        assert!(!b.is_stateful());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = Registry::new("test");
        registry.register("a", &[], constant).unwrap();

        let err = registry.register("a", &[], constant).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateName { name: "a".into() });

        let err = registry.register_stateful("a", &[], MeanOf).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateName { name: "a".into() });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_feature() {
        let registry = Registry::new("test");
        assert_eq!(
            registry.lookup("ghost").unwrap_err(),
            ValidationError::UnknownFeature { name: "ghost".into() }
        );
    }

    #[test]
    fn test_forward_reference_is_allowed_at_registration() {
        let mut registry = Registry::new("test");
        registry.register("late_consumer", &["defined_later"], constant).unwrap();
        assert!(registry.validate().is_err());

        registry.register("defined_later", &[], constant).unwrap();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_stateful_definition_round_trips_params() {
        let mut registry = Registry::new("test");
        registry.register_stateful("mean_x", &[], MeanOf).unwrap();
        let definition = registry.lookup("mean_x").unwrap();
        assert!(definition.is_stateful());

        let dataset = Table::with_default_index(2)
            .with_column("x", Column::Int(vec![Some(2), Some(4)]))
            .unwrap();
        let dependencies = HashMap::new();
        let inputs = FeatureInputs::new("mean_x", &dataset, &dependencies);

        let Compute::Stateful(estimator) = definition.compute() else {
            panic!("expected a stateful compute");
        };
        let (column, params) = estimator.fit_apply(&inputs).unwrap();
        assert_eq!(params, serde_json::json!(3.0));
        assert_eq!(column, Column::Float(vec![Some(3.0), Some(3.0)]));
        assert_eq!(
            estimator.apply_value(&inputs, &serde_json::json!(10.0)).unwrap(),
            Column::Float(vec![Some(10.0), Some(10.0)])
        );
    }
}
