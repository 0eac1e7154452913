// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for generator invocations (`fit_transform` / `transform`).
//!
//! Invocation tags are recorded here and nowhere near the computations.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A generator invocation started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::generator::InvocationStarted;
///
/// let msg = InvocationStarted {
///     registry: "taxi_nyc",
///     mode: "fit",
///     tags: "dataset=train",
///     rows: 1024,
///     feature_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct InvocationStarted<'a> {
    pub registry: &'a str,
    pub mode: &'a str,
    pub tags: &'a str,
    pub rows: usize,
    pub feature_count: usize,
}

impl Display for InvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} over {} rows with {} features from '{}' [{}]",
            self.mode, self.rows, self.feature_count, self.registry, self.tags
        )
    }
}

impl StructuredLog for InvocationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            registry = self.registry,
            mode = self.mode,
            tags = self.tags,
            rows = self.rows,
            feature_count = self.feature_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "invocation",
            span_name = name,
            registry = self.registry,
            mode = self.mode,
            tags = self.tags,
        )
    }
}

/// A generator invocation produced its result table.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::generator::InvocationCompleted;
/// use std::time::Duration;
///
/// let msg = InvocationCompleted {
///     mode: "transform",
///     rows: 1024,
///     columns: 2,
///     fitted_count: 0,
///     duration: Duration::from_millis(40),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct InvocationCompleted<'a> {
    pub mode: &'a str,
    pub rows: usize,
    pub columns: usize,
    pub fitted_count: usize,
    pub duration: std::time::Duration,
}

impl Display for InvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Completed {}: {} rows x {} columns, {} features fitted, in {:?}",
            self.mode, self.rows, self.columns, self.fitted_count, self.duration
        )
    }
}

impl StructuredLog for InvocationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            mode = self.mode,
            rows = self.rows,
            columns = self.columns,
            fitted_count = self.fitted_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "invocation_completed",
            span_name = name,
            mode = self.mode,
            duration = ?self.duration,
        )
    }
}

/// A generator invocation aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::generator::InvocationFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = InvocationFailed {
///     mode: "fit",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct InvocationFailed<'a> {
    pub mode: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for InvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} aborted: {}", self.mode, self.error)
    }
}

impl StructuredLog for InvocationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            mode = self.mode,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "invocation_failed",
            span_name = name,
            mode = self.mode,
            error = %self.error,
        )
    }
}
