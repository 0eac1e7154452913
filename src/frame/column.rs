// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::FrameError;

/// A typed, nullable column of values.
///
/// `None` marks a missing or invalid cell (an unparsable timestamp, an unseen
/// category at transform time, ...). Every column of a [`Table`](super::Table)
/// has exactly one entry per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "snake_case")]
pub enum Column {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the column's value type, used in error messages.
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Int(_) => "int",
            Column::Float(_) => "float",
            Column::Bool(_) => "bool",
            Column::Str(_) => "str",
            Column::Timestamp(_) => "timestamp",
        }
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        fn nulls<T>(values: &[Option<T>]) -> usize {
            values.iter().filter(|v| v.is_none()).count()
        }
        match self {
            Column::Int(v) => nulls(v),
            Column::Float(v) => nulls(v),
            Column::Bool(v) => nulls(v),
            Column::Str(v) => nulls(v),
            Column::Timestamp(v) => nulls(v),
        }
    }

    pub fn as_int(&self, column: &str) -> Result<&[Option<i64>], FrameError> {
        match self {
            Column::Int(v) => Ok(v),
            other => Err(other.type_mismatch(column, "int")),
        }
    }

    pub fn as_float(&self, column: &str) -> Result<&[Option<f64>], FrameError> {
        match self {
            Column::Float(v) => Ok(v),
            other => Err(other.type_mismatch(column, "float")),
        }
    }

    pub fn as_bool(&self, column: &str) -> Result<&[Option<bool>], FrameError> {
        match self {
            Column::Bool(v) => Ok(v),
            other => Err(other.type_mismatch(column, "bool")),
        }
    }

    pub fn as_str(&self, column: &str) -> Result<&[Option<String>], FrameError> {
        match self {
            Column::Str(v) => Ok(v),
            other => Err(other.type_mismatch(column, "str")),
        }
    }

    pub fn as_timestamp(&self, column: &str) -> Result<&[Option<NaiveDateTime>], FrameError> {
        match self {
            Column::Timestamp(v) => Ok(v),
            other => Err(other.type_mismatch(column, "timestamp")),
        }
    }

    /// Numeric view of an int or float column.
    pub fn to_f64(&self, column: &str) -> Result<Vec<Option<f64>>, FrameError> {
        match self {
            Column::Float(v) => Ok(v.clone()),
            Column::Int(v) => Ok(v.iter().map(|x| x.map(|x| x as f64)).collect()),
            other => Err(other.type_mismatch(column, "int or float")),
        }
    }

    fn type_mismatch(&self, column: &str, expected: &'static str) -> FrameError {
        FrameError::TypeMismatch {
            column: column.to_string(),
            expected,
            actual: self.dtype(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let column = Column::Int(vec![Some(1), None, Some(3)]);
        assert_eq!(column.len(), 3);
        assert_eq!(column.null_count(), 1);
        assert_eq!(column.as_int("n").unwrap(), &[Some(1), None, Some(3)]);

        let err = column.as_str("n").unwrap_err();
        assert_eq!(
            err,
            FrameError::TypeMismatch {
                column: "n".into(),
                expected: "str",
                actual: "int",
            }
        );
    }

    #[test]
    fn test_to_f64_widens_ints() {
        let column = Column::Int(vec![Some(2), None]);
        assert_eq!(column.to_f64("n").unwrap(), vec![Some(2.0), None]);
        assert!(Column::Bool(vec![Some(true)]).to_f64("b").is_err());
    }

    #[test]
    fn test_serializes_with_dtype_tag() {
        let column = Column::Str(vec![Some("a".into()), None]);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json, serde_json::json!({"dtype": "str", "values": ["a", null]}));
    }
}
