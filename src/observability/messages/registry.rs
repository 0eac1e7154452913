// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for feature registration.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A feature definition was added to a registry.
///
/// # Log Level
/// `debug!` - Happens once per feature at catalog construction
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::registry::FeatureRegistered;
///
/// let deps = vec!["pickup_time".to_string()];
/// let msg = FeatureRegistered {
///     registry: "taxi_nyc",
///     feature: "pickup_hour",
///     dependencies: &deps,
///     stateful: false,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FeatureRegistered<'a> {
    pub registry: &'a str,
    pub feature: &'a str,
    pub dependencies: &'a [String],
    pub stateful: bool,
}

impl Display for FeatureRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered feature '{}' in '{}' (dependencies: [{}], stateful={})",
            self.feature,
            self.registry,
            self.dependencies.join(", "),
            self.stateful
        )
    }
}

impl StructuredLog for FeatureRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            registry = self.registry,
            feature = self.feature,
            dependency_count = self.dependencies.len(),
            stateful = self.stateful,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "feature_registered",
            span_name = name,
            registry = self.registry,
            feature = self.feature,
            stateful = self.stateful,
        )
    }
}
