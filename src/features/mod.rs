// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made feature catalogs and reusable estimators.

mod encoders;
pub mod taxi;

pub use encoders::{CategoryIndex, CategoryIndexer, Moments, Standardizer};
pub use taxi::register_taxi_features;
