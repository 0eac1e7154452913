// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for a human-readable line and
//! [`StructuredLog`] to emit the same event with structured fields.
//!
//! # Organization
//!
//! * `registry` - Feature registration events
//! * `resolution` - Request resolution (closure, ordering, cycles)
//! * `engine` - Plan execution and dependency levels
//! * `feature` - Per-feature computation events
//! * `generator` - fit_transform / transform invocation lifecycle
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_featurewood::observability::messages::feature::FeatureComputed;
//! use the_featurewood::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! let msg = FeatureComputed {
//!     feature: "pickup_hour",
//!     mode: "transform",
//!     rows: 1024,
//!     null_count: 0,
//!     duration: Duration::from_micros(180),
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod feature;
pub mod generator;
pub mod registry;
pub mod resolution;

/// A log message that can emit itself as a structured tracing event or span.
pub trait StructuredLog {
    /// Emit the message as an event at its own log level
    fn log(&self);

    /// Build a span carrying the message's fields
    fn span(&self, name: &str) -> Span;
}
