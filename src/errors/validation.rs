// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while registering features or resolving a feature request
/// against a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A feature with this name is already registered
    #[error("Feature '{name}' is already registered")]
    DuplicateName { name: String },

    /// A requested feature has no definition in the registry
    #[error("Feature '{name}' is not registered")]
    UnknownFeature { name: String },

    /// A definition declares a dependency that was never registered
    #[error("Feature '{feature}' depends on '{dependency}' which is not registered")]
    UnknownDependency {
        /// The feature that declared the dependency
        feature: String,
        /// The dependency that couldn't be resolved
        dependency: String,
    },

    /// The dependency relation contains a cycle
    #[error("Cyclic dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The cycle path, first and last entries are the same feature
        cycle: Vec<String>,
    },
}
