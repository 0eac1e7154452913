// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for resolving a feature request against a registry.
//!
//! This module contains message types for logging events related to:
//! * Dependency closure computation
//! * Topological ordering
//! * Resolution failures (unknown features, cycles)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A feature request was resolved into an execution order.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::resolution::RequestResolved;
///
/// let order = vec!["pickup_time".to_string(), "pickup_hour".to_string()];
/// let msg = RequestResolved {
///     registry: "taxi_nyc",
///     requested_count: 1,
///     order: &order,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RequestResolved<'a> {
    pub registry: &'a str,
    pub requested_count: usize,
    pub order: &'a [String],
}

impl Display for RequestResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved {} requested features from '{}' into {} computations: {}",
            self.requested_count,
            self.registry,
            self.order.len(),
            self.order.join(" -> ")
        )
    }
}

impl StructuredLog for RequestResolved<'_> {
    fn log(&self) {
        tracing::info!(
            registry = self.registry,
            requested_count = self.requested_count,
            closure_size = self.order.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "request_resolved",
            span_name = name,
            registry = self.registry,
            requested_count = self.requested_count,
            closure_size = self.order.len(),
        )
    }
}

/// Resolution of a feature request failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_featurewood::errors::ValidationError;
/// use the_featurewood::observability::messages::resolution::ResolutionFailed;
///
/// let error = ValidationError::CyclicDependency {
///     cycle: vec!["a".into(), "b".into(), "a".into()],
/// };
/// let msg = ResolutionFailed {
///     registry: "taxi_nyc",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ResolutionFailed<'a> {
    pub registry: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to resolve feature request against '{}': {}",
            self.registry, self.error
        )
    }
}

impl StructuredLog for ResolutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            registry = self.registry,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "resolution_failed",
            span_name = name,
            registry = self.registry,
            error = %self.error,
        )
    }
}
