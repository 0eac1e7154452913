// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stateful encoders that learn their parameters during a fit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::FrameError;
use crate::frame::Column;
use crate::registry::{Estimator, FeatureInputs};

/// Where an encoder reads its input from
#[derive(Debug, Clone)]
enum Source {
    Raw(String),
    Feature(String),
}

impl Source {
    fn read<'a>(&self, inputs: &FeatureInputs<'a>) -> Result<&'a Column, FrameError> {
        match self {
            Source::Raw(column) => inputs.raw(column),
            Source::Feature(name) => inputs.dependency(name),
        }
    }

    fn name(&self) -> &str {
        match self {
            Source::Raw(name) | Source::Feature(name) => name,
        }
    }
}

/// Encodes categories as integer indices.
///
/// A fit collects the distinct non-null values of the input, sorts them, and
/// numbers them from 0. Values not seen during the fit encode as null. String,
/// int and bool columns are accepted; ints and bools are keyed by their text.
#[derive(Debug, Clone)]
pub struct CategoryIndexer {
    source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub categories: Vec<String>,
}

impl CategoryIndexer {
    /// Index a raw dataset column
    pub fn on_raw(column: impl Into<String>) -> Self {
        Self {
            source: Source::Raw(column.into()),
        }
    }

    /// Index another feature; it must also be declared as a dependency
    pub fn on_feature(name: impl Into<String>) -> Self {
        Self {
            source: Source::Feature(name.into()),
        }
    }

    fn keys(&self, inputs: &FeatureInputs<'_>) -> Result<Vec<Option<String>>, FrameError> {
        let column = self.source.read(inputs)?;
        match column {
            Column::Str(values) => Ok(values.clone()),
            Column::Int(values) => Ok(values.iter().map(|v| v.map(|v| v.to_string())).collect()),
            Column::Bool(values) => Ok(values.iter().map(|v| v.map(|v| v.to_string())).collect()),
            other => Err(FrameError::TypeMismatch {
                column: self.source.name().to_string(),
                expected: "str, int or bool",
                actual: other.dtype(),
            }),
        }
    }
}

impl Estimator for CategoryIndexer {
    type Params = CategoryIndex;

    fn fit(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<CategoryIndex> {
        let mut categories: Vec<String> = self.keys(inputs)?.into_iter().flatten().collect();
        categories.sort();
        categories.dedup();
        Ok(CategoryIndex { categories })
    }

    fn apply(&self, inputs: &FeatureInputs<'_>, params: &CategoryIndex) -> anyhow::Result<Column> {
        let lookup: HashMap<&str, i64> = params
            .categories
            .iter()
            .zip(0i64..)
            .map(|(category, index)| (category.as_str(), index))
            .collect();

        Ok(Column::Int(
            self.keys(inputs)?
                .iter()
                .map(|key| key.as_deref().and_then(|key| lookup.get(key).copied()))
                .collect(),
        ))
    }
}

/// Rescales a numeric input to zero mean and unit variance.
///
/// A fit learns the mean and population standard deviation of the non-null
/// values; `apply` maps `x` to `(x - mean) / std`. A zero standard deviation
/// is treated as 1. Nulls stay null.
#[derive(Debug, Clone)]
pub struct Standardizer {
    source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub std: f64,
}

impl Standardizer {
    pub fn on_raw(column: impl Into<String>) -> Self {
        Self {
            source: Source::Raw(column.into()),
        }
    }

    pub fn on_feature(name: impl Into<String>) -> Self {
        Self {
            source: Source::Feature(name.into()),
        }
    }

    fn values(&self, inputs: &FeatureInputs<'_>) -> Result<Vec<Option<f64>>, FrameError> {
        self.source.read(inputs)?.to_f64(self.source.name())
    }
}

impl Estimator for Standardizer {
    type Params = Moments;

    fn fit(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<Moments> {
        let present: Vec<f64> = self.values(inputs)?.into_iter().flatten().collect();
        if present.is_empty() {
            anyhow::bail!("'{}' has no non-null values to fit on", self.source.name());
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let variance = present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Ok(Moments {
            mean,
            std: variance.sqrt(),
        })
    }

    fn apply(&self, inputs: &FeatureInputs<'_>, params: &Moments) -> anyhow::Result<Column> {
        let std = if params.std == 0.0 { 1.0 } else { params.std };
        Ok(Column::Float(
            self.values(inputs)?
                .iter()
                .map(|x| x.map(|x| (x - params.mean) / std))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Table;
    use std::sync::Arc;

    fn inputs_for<'a>(
        dataset: &'a Table,
        deps: &'a HashMap<String, Arc<Column>>,
    ) -> FeatureInputs<'a> {
        FeatureInputs::new("encoded", dataset, deps)
    }

    #[test]
    fn test_category_indexer_sorts_and_maps_unseen_to_null() {
        let train = Table::with_default_index(4)
            .with_column(
                "vendor",
                Column::Str(vec![Some("b".into()), Some("a".into()), None, Some("b".into())]),
            )
            .unwrap();
        let deps = HashMap::new();
        let indexer = CategoryIndexer::on_raw("vendor");

        let params = indexer.fit(&inputs_for(&train, &deps)).unwrap();
        assert_eq!(params.categories, vec!["a", "b"]);

        let test = Table::with_default_index(3)
            .with_column(
                "vendor",
                Column::Str(vec![Some("a".into()), Some("c".into()), None]),
            )
            .unwrap();
        let encoded = indexer.apply(&inputs_for(&test, &deps), &params).unwrap();
        assert_eq!(encoded, Column::Int(vec![Some(0), None, None]));
    }

    #[test]
    fn test_category_indexer_on_int_feature() {
        let dataset = Table::with_default_index(3);
        let deps = HashMap::from([(
            "passengers".to_string(),
            Arc::new(Column::Int(vec![Some(2), Some(1), Some(2)])),
        )]);
        let indexer = CategoryIndexer::on_feature("passengers");

        let params = indexer.fit(&inputs_for(&dataset, &deps)).unwrap();
        let encoded = indexer.apply(&inputs_for(&dataset, &deps), &params).unwrap();
        assert_eq!(encoded, Column::Int(vec![Some(1), Some(0), Some(1)]));
    }

    #[test]
    fn test_category_indexer_rejects_float() {
        let dataset = Table::with_default_index(1)
            .with_column("x", Column::Float(vec![Some(1.0)]))
            .unwrap();
        let deps = HashMap::new();
        assert!(CategoryIndexer::on_raw("x")
            .fit(&inputs_for(&dataset, &deps))
            .is_err());
    }

    #[test]
    fn test_standardizer() {
        let dataset = Table::with_default_index(3)
            .with_column("fare", Column::Int(vec![Some(1), None, Some(3)]))
            .unwrap();
        let deps = HashMap::new();
        let standardizer = Standardizer::on_raw("fare");

        let params = standardizer.fit(&inputs_for(&dataset, &deps)).unwrap();
        assert_eq!(params, Moments { mean: 2.0, std: 1.0 });

        let scaled = standardizer.apply(&inputs_for(&dataset, &deps), &params).unwrap();
        assert_eq!(scaled, Column::Float(vec![Some(-1.0), None, Some(1.0)]));
    }

    #[test]
    fn test_standardizer_constant_input() {
        let dataset = Table::with_default_index(2)
            .with_column("x", Column::Float(vec![Some(5.0), Some(5.0)]))
            .unwrap();
        let deps = HashMap::new();
        let standardizer = Standardizer::on_raw("x");

        let params = standardizer.fit(&inputs_for(&dataset, &deps)).unwrap();
        assert_eq!(params.std, 0.0);
        let scaled = standardizer.apply(&inputs_for(&dataset, &deps), &params).unwrap();
        assert_eq!(scaled, Column::Float(vec![Some(0.0), Some(0.0)]));
    }

    #[test]
    fn test_standardizer_needs_values() {
        let dataset = Table::with_default_index(1)
            .with_column("x", Column::Float(vec![None]))
            .unwrap();
        let deps = HashMap::new();
        assert!(Standardizer::on_raw("x").fit(&inputs_for(&dataset, &deps)).is_err());
    }
}
