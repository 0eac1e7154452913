// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types emitted by the executors while they work through a plan.
//!
//! One `PlanExecutionStarted` / `PlanExecutionCompleted` pair brackets every
//! executor run. The level executor also reports each dependency level as it
//! begins, naming the features computed side by side.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An executor picked up a resolved plan.
///
/// # Log Level
/// `debug!` - Executor detail below the invocation events
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::engine::PlanExecutionStarted;
///
/// let msg = PlanExecutionStarted {
///     strategy: "sequential",
///     mode: "fit",
///     feature_count: 3,
///     max_concurrency: 1,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Computing 3 features in fit mode (sequential, max_concurrency=1)"
/// );
/// ```
pub struct PlanExecutionStarted<'a> {
    pub strategy: &'a str,
    pub mode: &'a str,
    pub feature_count: usize,
    pub max_concurrency: usize,
}

impl Display for PlanExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computing {} features in {} mode ({}, max_concurrency={})",
            self.feature_count, self.mode, self.strategy, self.max_concurrency
        )
    }
}

impl StructuredLog for PlanExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            strategy = self.strategy,
            mode = self.mode,
            feature_count = self.feature_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "plan_execution",
            span_name = name,
            strategy = self.strategy,
            mode = self.mode,
            feature_count = self.feature_count,
        )
    }
}

/// Every feature of the plan was computed.
///
/// `fitted` counts the stateful features that learned params in this run; it
/// is always 0 for a transform.
///
/// # Log Level
/// `debug!` - Executor detail below the invocation events
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::engine::PlanExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = PlanExecutionCompleted {
///     strategy: "level",
///     mode: "fit",
///     computed: 5,
///     fitted: 2,
///     duration: Duration::from_millis(40),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct PlanExecutionCompleted<'a> {
    pub strategy: &'a str,
    pub mode: &'a str,
    pub computed: usize,
    pub fitted: usize,
    pub duration: std::time::Duration,
}

impl Display for PlanExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed {} features in {} mode ({} fitted) with {} executor in {:?}",
            self.computed, self.mode, self.fitted, self.strategy, self.duration
        )
    }
}

impl StructuredLog for PlanExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            strategy = self.strategy,
            mode = self.mode,
            computed = self.computed,
            fitted = self.fitted,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "plan_execution_completed",
            span_name = name,
            strategy = self.strategy,
            mode = self.mode,
            computed = self.computed,
        )
    }
}

/// The level executor began one dependency level.
///
/// # Log Level
/// `trace!` - One event per level per invocation
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::engine::DependencyLevelStarted;
///
/// let features = vec!["pickup_hour".to_string(), "pickup_weekday".to_string()];
/// let msg = DependencyLevelStarted {
///     level: 1,
///     level_count: 2,
///     features: &features,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Dependency level 2/2: pickup_hour, pickup_weekday"
/// );
/// ```
pub struct DependencyLevelStarted<'a> {
    /// Zero-based level index
    pub level: usize,
    pub level_count: usize,
    pub features: &'a [String],
}

impl Display for DependencyLevelStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dependency level {}/{}: {}",
            self.level + 1,
            self.level_count,
            self.features.join(", ")
        )
    }
}

impl StructuredLog for DependencyLevelStarted<'_> {
    fn log(&self) {
        tracing::trace!(
            level = self.level,
            level_count = self.level_count,
            width = self.features.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "dependency_level",
            span_name = name,
            level = self.level,
            width = self.features.len(),
        )
    }
}
