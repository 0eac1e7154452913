// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::engine::Mode;
use crate::frame::{Column, Table};
use crate::generator::Tags;

/// Where a feature table came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    /// Name of the registry the features were resolved against
    pub registry: String,
    pub mode: Mode,
    pub tags: Tags,
    /// Every feature computed, in computation order
    pub resolved_order: Vec<String>,
    /// Stateful features that learned parameters during this invocation
    pub fitted: Vec<String>,
}

/// Output of a generator invocation: one column per requested feature, in
/// request order, indexed like the input dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    table: Table,
    provenance: Provenance,
}

impl FeatureTable {
    pub(crate) fn new(table: Table, provenance: Provenance) -> Self {
        Self { table, provenance }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.get(name)
    }

    /// Drop the provenance and keep the table, e.g. to hand it to a model
    pub fn into_table(self) -> Table {
        self.table
    }
}
