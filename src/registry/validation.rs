// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency validation for feature registries.
//!
//! Two checks run over a registry's definitions, in order:
//!
//! 1. **Reference Validation**: every declared dependency names a registered feature
//! 2. **Cycle Detection**: DFS with a recursion stack over dependency edges
//!
//! Cycle detection needs a structurally valid graph, so it only runs when
//! reference validation passed.
//!
//! ## Cycle Detection Algorithm
//! Uses **Depth-First Search (DFS) with recursion stack** ("three colors"),
//! driven by an explicit frame stack rather than call recursion:
//! - **White (unvisited)**: Feature not yet explored
//! - **Gray (in recursion stack)**: Feature whose dependencies are being explored
//! - **Black (visited)**: Feature and all of its dependencies explored
//!
//! Reaching a gray feature means a back edge, i.e. a cycle. The current DFS
//! path from that feature onward, plus the feature again, is the cycle.
//!
//! **Time Complexity**: O(V + E) where V = features, E = dependency edges
//!
//! The same walk ([`resolve_closure`]) drives request resolution: it visits
//! only what is reachable from the requested features and reports unknown
//! names with the feature that referenced them.

use std::collections::HashSet;

use crate::errors::ValidationError;
use crate::registry::{FeatureDefinition, Registry};

/// Validates every definition of a registry.
///
/// Reference errors are accumulated so all of them are reported at once;
/// cycle detection is skipped while there are reference errors.
pub fn validate_registry(registry: &Registry) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_dependency_references(registry);

    if errors.is_empty() {
        let all: Vec<String> = registry.names().map(str::to_string).collect();
        if let Err(cycle) = resolve_closure(registry, &all) {
            errors.push(cycle);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_dependency_references(registry: &Registry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for definition in registry.definitions() {
        for dependency in definition.dependencies() {
            if !registry.contains(dependency) {
                errors.push(ValidationError::UnknownDependency {
                    feature: definition.name().to_string(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
    errors
}

/// Walks the dependency closure of `roots` depth first.
///
/// Returns the closure in DFS post-order (every dependency before its
/// dependents), each feature once. Fails on the first unknown name or cycle
/// encountered.
pub(crate) fn resolve_closure(
    registry: &Registry,
    roots: &[String],
) -> Result<Vec<String>, ValidationError> {
    let mut walk = ClosureWalk {
        registry,
        visited: HashSet::new(),
        rec_stack: HashSet::new(),
        closure: Vec::new(),
    };

    for root in roots {
        walk.visit(root)?;
    }

    Ok(walk.closure)
}

struct ClosureWalk<'a> {
    registry: &'a Registry,
    visited: HashSet<&'a str>,
    rec_stack: HashSet<&'a str>,
    closure: Vec<String>,
}

/// One feature on the DFS path and the index of its next dependency to visit
struct Frame<'a> {
    definition: &'a FeatureDefinition,
    next: usize,
}

impl<'a> ClosureWalk<'a> {
    /// DFS from `root`. `path` holds the current DFS path as explicit frames.
    fn visit(&mut self, root: &str) -> Result<(), ValidationError> {
        let registry = self.registry;
        if self.visited.contains(root) {
            return Ok(());
        }
        let definition = registry
            .get(root)
            .ok_or_else(|| ValidationError::UnknownFeature {
                name: root.to_string(),
            })?;

        let mut path = vec![Frame { definition, next: 0 }];
        self.rec_stack.insert(definition.name());

        while let Some(frame) = path.last_mut() {
            let current = frame.definition;
            let next = frame.next;
            frame.next += 1;

            let Some(dependency) = current.dependencies().get(next) else {
                // All dependencies done: post-order emit
                path.pop();
                self.rec_stack.remove(current.name());
                self.visited.insert(current.name());
                self.closure.push(current.name().to_string());
                continue;
            };

            if self.rec_stack.contains(dependency.as_str()) {
                // Back edge: the cycle runs from the dependency's place in the path to here
                let cycle_start = path
                    .iter()
                    .position(|f| f.definition.name() == dependency.as_str())
                    .unwrap_or(0);
                let mut cycle: Vec<String> = path[cycle_start..]
                    .iter()
                    .map(|f| f.definition.name().to_string())
                    .collect();
                cycle.push(dependency.clone());
                return Err(ValidationError::CyclicDependency { cycle });
            }
            if self.visited.contains(dependency.as_str()) {
                continue;
            }

            let definition = registry.get(dependency).ok_or_else(|| {
                ValidationError::UnknownDependency {
                    feature: current.name().to_string(),
                    dependency: dependency.clone(),
                }
            })?;
            self.rec_stack.insert(definition.name());
            path.push(Frame { definition, next: 0 });
        }

        Ok(())
    }
}
