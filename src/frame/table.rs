// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::errors::FrameError;
use crate::frame::Column;

/// Column-oriented table keyed by a row index.
///
/// Used both for the raw dataset handed to a generator and for the feature
/// table it returns. Column order is insertion order; every column has one
/// value per index entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<i64>,
    names: Vec<String>,
    columns: HashMap<String, Column>,
}

impl Table {
    /// Create an empty table over the given row index
    pub fn new(index: Vec<i64>) -> Self {
        Self {
            index,
            names: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// Create an empty table indexed `0..rows`
    pub fn with_default_index(rows: usize) -> Self {
        Self::new((0..rows as i64).collect())
    }

    /// Builder-style [`Table::insert_column`]
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, FrameError> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    /// Append a column, rejecting duplicates and columns not aligned to the index
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), FrameError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(FrameError::DuplicateColumn { name });
        }
        if column.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                actual: column.len(),
            });
        }
        self.names.push(name.clone());
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        self.columns.get(name).ok_or_else(|| FrameError::MissingColumn {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.names.len()
    }

    /// Iterate columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .filter_map(|name| self.columns.get(name).map(|c| (name.as_str(), c)))
    }

    /// New table with only the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, FrameError> {
        let mut selected = Table::new(self.index.clone());
        for name in names {
            let name = name.as_ref();
            selected.insert_column(name, self.column(name)?.clone())?;
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![10, 11, 12])
            .with_column("a", Column::Int(vec![Some(1), Some(2), Some(3)]))
            .unwrap()
            .with_column("b", Column::Bool(vec![Some(true), None, Some(false)]))
            .unwrap()
    }

    #[test]
    fn test_insert_rejects_misaligned_column() {
        let mut table = sample();
        let err = table
            .insert_column("c", Column::Int(vec![Some(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            FrameError::LengthMismatch {
                column: "c".into(),
                expected: 3,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_insert_rejects_duplicate_column() {
        let mut table = sample();
        let err = table
            .insert_column("a", Column::Int(vec![None, None, None]))
            .unwrap_err();
        assert_eq!(err, FrameError::DuplicateColumn { name: "a".into() });
    }

    #[test]
    fn test_select_preserves_index_and_requested_order() {
        let table = sample();
        let selected = table.select(&["b", "a"]).unwrap();
        assert_eq!(selected.index(), &[10, 11, 12]);
        assert_eq!(selected.column_names(), &["b".to_string(), "a".to_string()]);

        assert_eq!(
            table.select(&["zzz"]).unwrap_err(),
            FrameError::MissingColumn { name: "zzz".into() }
        );
    }

    #[test]
    fn test_iter_follows_insertion_order() {
        let table = sample();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 3);
    }
}
