// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::errors::ValidationError;
use crate::observability::messages::resolution::{RequestResolved, ResolutionFailed};
use crate::observability::messages::StructuredLog;
use crate::registry::{resolve_closure, Registry};

/// A feature request resolved against a registry.
///
/// Holds the requested features plus their transitive dependency closure in a
/// topological order: every feature appears once, after all of its
/// dependencies. Among features whose dependencies are all satisfied, the one
/// registered first goes first, so a fixed registry and request always
/// produce the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    requested: Vec<String>,
    order: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
    stateful: HashSet<String>,
}

impl ExecutionPlan {
    /// Resolve `requested` against `registry`.
    ///
    /// Fails with `UnknownFeature` for a requested name with no definition,
    /// `UnknownDependency` for a declared dependency with no definition, and
    /// `CyclicDependency` (naming the full cycle) if the closure has a cycle.
    /// Repeated names in the request are collapsed to their first occurrence.
    pub fn resolve<S: AsRef<str>>(
        registry: &Registry,
        requested: &[S],
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let requested: Vec<String> = requested
            .iter()
            .map(|name| name.as_ref().to_string())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        let closure = resolve_closure(registry, &requested).map_err(|error| {
            ResolutionFailed {
                registry: registry.name(),
                error: &error,
            }
            .log();
            error
        })?;

        let mut dependencies = HashMap::with_capacity(closure.len());
        let mut stateful = HashSet::new();
        for name in &closure {
            let definition = registry.lookup(name)?;
            dependencies.insert(name.clone(), definition.dependencies().to_vec());
            if definition.is_stateful() {
                stateful.insert(name.clone());
            }
        }

        let order = topological_order(registry, &closure, &dependencies);

        RequestResolved {
            registry: registry.name(),
            requested_count: requested.len(),
            order: &order,
        }
        .log();

        Ok(Self {
            requested,
            order,
            dependencies,
            stateful,
        })
    }

    /// Requested features, duplicates removed, in request order
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Every feature to compute, dependencies first
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.dependencies.contains_key(feature)
    }

    /// Declared dependencies of a feature in the plan
    pub fn dependencies_of(&self, feature: &str) -> &[String] {
        self.dependencies
            .get(feature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Stateful features of the closure, in execution order
    pub fn stateful_features(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|name| self.stateful.contains(*name))
            .map(String::as_str)
    }

    /// Group the order into dependency levels.
    ///
    /// - Level 0: features with no dependencies
    /// - Level N: features whose deepest dependency sits at level N-1
    ///
    /// Features in the same level share no dependency relation and may be
    /// computed concurrently. Within a level, execution order is kept.
    pub fn levels(&self) -> Vec<Vec<String>> {
        let mut depth: HashMap<&str, usize> = HashMap::with_capacity(self.order.len());
        let mut levels: Vec<Vec<String>> = Vec::new();

        for name in &self.order {
            let level = self
                .dependencies_of(name)
                .iter()
                .filter_map(|dependency| depth.get(dependency.as_str()))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(name, level);

            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(name.clone());
        }

        levels
    }
}

/// Kahn's algorithm over the closure, ready features popped by registration
/// position.
fn topological_order(
    registry: &Registry,
    closure: &[String],
    dependencies: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(closure.len());
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::with_capacity(closure.len());

    for name in closure {
        let deps = &dependencies[name];
        in_degree.insert(name, deps.len());
        for dependency in deps {
            dependents.entry(dependency.as_str()).or_default().push(name);
        }
    }

    let position = |name: &str| registry.position(name).unwrap_or(usize::MAX);

    let mut ready: BinaryHeap<Reverse<(usize, &str)>> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(&name, _)| Reverse((position(name), name)))
        .collect();

    let mut order = Vec::with_capacity(closure.len());
    while let Some(Reverse((_, name))) = ready.pop() {
        order.push(name.to_string());
        for &dependent in dependents.get(name).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse((position(dependent), dependent)));
                }
            }
        }
    }

    // the closure walk already rejected cycles
    debug_assert_eq!(order.len(), closure.len());
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;

    fn registry_of(features: &[(&str, &[&str])]) -> Registry {
        let mut registry = Registry::new("test");
        for (name, deps) in features {
            registry
                .register(*name, deps, |inputs| Ok(Column::Int(vec![None; inputs.num_rows()])))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_closure_of_chain_is_ordered_dependencies_first() {
        // registered dependents-first on purpose
        let registry = registry_of(&[("x", &["y"]), ("y", &["z"]), ("z", &[])]);
        let plan = ExecutionPlan::resolve(&registry, &["x"]).unwrap();

        assert_eq!(plan.order(), &["z", "y", "x"]);
        assert_eq!(plan.requested(), &["x"]);
    }

    #[test]
    fn test_ties_break_by_registration_order() {
        let registry = registry_of(&[
            ("c", &[]),
            ("a", &[]),
            ("b", &[]),
            ("sum", &["a", "b", "c"]),
        ]);
        let plan = ExecutionPlan::resolve(&registry, &["sum"]).unwrap();
        assert_eq!(plan.order(), &["c", "a", "b", "sum"]);
    }

    #[test]
    fn test_order_is_stable_across_resolutions() {
        let registry = registry_of(&[
            ("raw", &[]),
            ("left", &["raw"]),
            ("right", &["raw"]),
            ("other", &[]),
            ("join", &["left", "right", "other"]),
        ]);
        let first = ExecutionPlan::resolve(&registry, &["join"]).unwrap();
        for _ in 0..20 {
            assert_eq!(ExecutionPlan::resolve(&registry, &["join"]).unwrap().order(), first.order());
        }
        assert_eq!(first.order(), &["raw", "left", "right", "other", "join"]);
    }

    #[test]
    fn test_unrequested_features_are_left_out() {
        let registry = registry_of(&[("a", &[]), ("b", &["a"]), ("c", &[])]);
        let plan = ExecutionPlan::resolve(&registry, &["b"]).unwrap();
        assert_eq!(plan.order(), &["a", "b"]);
        assert!(!plan.contains("c"));
    }

    #[test]
    fn test_duplicate_requests_collapse() {
        let registry = registry_of(&[("a", &[]), ("b", &["a"])]);
        let plan = ExecutionPlan::resolve(&registry, &["b", "a", "b"]).unwrap();
        assert_eq!(plan.requested(), &["b", "a"]);
        assert_eq!(plan.order(), &["a", "b"]);
    }

    #[test]
    fn test_cycle_is_reported_for_either_entry() {
        let registry = registry_of(&[("a", &["b"]), ("b", &["a"])]);

        for entry in ["a", "b"] {
            let err = ExecutionPlan::resolve(&registry, &[entry]).unwrap_err();
            let ValidationError::CyclicDependency { cycle } = err else {
                panic!("expected a cycle, got {err:?}");
            };
            assert_eq!(cycle.len(), 3);
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle[0], entry);
        }
    }

    #[test]
    fn test_cycle_outside_request_is_ignored() {
        let registry = registry_of(&[("ok", &[]), ("a", &["b"]), ("b", &["a"])]);
        assert!(ExecutionPlan::resolve(&registry, &["ok"]).is_ok());
    }

    #[test]
    fn test_unknown_names() {
        let registry = registry_of(&[("a", &["missing"])]);

        assert_eq!(
            ExecutionPlan::resolve(&registry, &["a"]).unwrap_err(),
            ValidationError::UnknownDependency {
                feature: "a".into(),
                dependency: "missing".into(),
            }
        );
        assert_eq!(
            ExecutionPlan::resolve(&registry, &["ghost"]).unwrap_err(),
            ValidationError::UnknownFeature { name: "ghost".into() }
        );
    }

    #[test]
    fn test_levels_group_independent_features() {
        let registry = registry_of(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["b", "c"]),
            ("e", &[]),
        ]);
        let plan = ExecutionPlan::resolve(&registry, &["d", "e"]).unwrap();

        assert_eq!(
            plan.levels(),
            vec![
                vec!["a".to_string(), "e".to_string()],
                vec!["b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ]
        );
    }

    #[test]
    fn test_empty_request() {
        let registry = registry_of(&[("a", &[])]);
        let plan = ExecutionPlan::resolve::<&str>(&registry, &[]).unwrap();
        assert!(plan.is_empty());
        assert!(plan.levels().is_empty());
    }
}
