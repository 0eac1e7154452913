// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters learned by stateful features, keyed by feature name.
///
/// A feature is "fitted" once it has an entry here. Entries are written only
/// when a fit invocation completes successfully and are read-only during
/// transforms. The store serializes to JSON so an embedding application can
/// persist it between processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FittedState(BTreeMap<String, serde_json::Value>);

impl FittedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: &str) -> Option<&serde_json::Value> {
        self.0.get(feature)
    }

    pub fn insert(&mut self, feature: impl Into<String>, params: serde_json::Value) {
        self.0.insert(feature.into(), params);
    }

    pub fn is_fitted(&self, feature: &str) -> bool {
        self.0.contains_key(feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fitted feature names, sorted
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overwrite entries with those of `other`
    pub fn merge(&mut self, other: FittedState) {
        self.0.extend(other.0);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
