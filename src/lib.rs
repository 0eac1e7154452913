// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // generator config
pub mod engine;     // resolution + executors
pub mod errors;     // error handling
pub mod features;   // reusable feature catalogs and estimators
pub mod frame;      // columnar tables
pub mod generator;  // fit/transform entry points
pub mod observability;
pub mod registry;   // feature definitions
pub mod traits;

pub use frame::{Column, Table};
pub use generator::{FeatureTable, Generator, Provenance, Tags};
pub use registry::{Estimator, FeatureDefinition, FeatureInputs, Registry};
