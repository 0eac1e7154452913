// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for individual feature computations.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A feature was computed and cached for the current invocation.
///
/// # Log Level
/// `debug!` - One event per feature per invocation
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::feature::FeatureComputed;
/// use std::time::Duration;
///
/// let msg = FeatureComputed {
///     feature: "pickup_hour",
///     mode: "fit",
///     rows: 1024,
///     null_count: 3,
///     duration: Duration::from_millis(2),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FeatureComputed<'a> {
    pub feature: &'a str,
    pub mode: &'a str,
    pub rows: usize,
    pub null_count: usize,
    pub duration: std::time::Duration,
}

impl Display for FeatureComputed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature '{}' computed ({}): rows={}, nulls={}, duration={:?}",
            self.feature, self.mode, self.rows, self.null_count, self.duration
        )
    }
}

impl StructuredLog for FeatureComputed<'_> {
    fn log(&self) {
        tracing::debug!(
            feature = self.feature,
            mode = self.mode,
            rows = self.rows,
            null_count = self.null_count,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "feature_computed",
            span_name = name,
            feature = self.feature,
            mode = self.mode,
        )
    }
}

/// A stateful feature learned its parameters during a fit.
///
/// # Log Level
/// `info!` - Learned state changes how later transforms behave
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::feature::FeatureFitted;
///
/// let msg = FeatureFitted {
///     feature: "vendor_index",
///     rows: 1024,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FeatureFitted<'a> {
    pub feature: &'a str,
    pub rows: usize,
}

impl Display for FeatureFitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Feature '{}' fitted on {} rows", self.feature, self.rows)
    }
}

impl StructuredLog for FeatureFitted<'_> {
    fn log(&self) {
        tracing::info!(feature = self.feature, rows = self.rows, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "feature_fitted",
            span_name = name,
            feature = self.feature,
            rows = self.rows,
        )
    }
}

/// A feature computation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_featurewood::observability::messages::feature::FeatureFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = FeatureFailed {
///     feature: "pickup_hour",
///     mode: "transform",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct FeatureFailed<'a> {
    pub feature: &'a str,
    pub mode: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for FeatureFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature '{}' failed during {}: {}",
            self.feature, self.mode, self.error
        )
    }
}

impl StructuredLog for FeatureFailed<'_> {
    fn log(&self) {
        tracing::error!(
            feature = self.feature,
            mode = self.mode,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "feature_failed",
            span_name = name,
            feature = self.feature,
            mode = self.mode,
            error = %self.error,
        )
    }
}
