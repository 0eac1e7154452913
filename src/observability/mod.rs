// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` and
//! [`messages::StructuredLog`] implementations so log lines are not scattered
//! as magic strings throughout the codebase.
//!
//! # Usage
//!
//! ```rust
//! use the_featurewood::observability::messages::feature::FeatureFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = FeatureFailed {
//!     feature: "pickup_hour",
//!     mode: "fit",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

use tracing_subscriber::EnvFilter;

pub mod messages;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `RUST_LOG` (default [`DEFAULT_LOG_FILTER`]).
///
/// Returns `false` when a global subscriber was already installed, e.g. by the
/// embedding application or another test.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
