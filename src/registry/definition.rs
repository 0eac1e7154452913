// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::FrameError;
use crate::frame::{Column, Table};

/// Signature of a stateless feature computation.
pub type ComputeFn = dyn Fn(&FeatureInputs<'_>) -> anyhow::Result<Column> + Send + Sync;

/// A feature computation that learns parameters from the data it is fitted on.
///
/// During a fit, the generator calls [`Estimator::fit`] and then
/// [`Estimator::apply`] with the freshly learned parameters. During a
/// transform only `apply` runs, with the parameters stored by the last
/// successful fit. Parameters must be serde-serializable so a generator's
/// fitted state can be exported.
pub trait Estimator: Send + Sync + 'static {
    type Params: Serialize + DeserializeOwned + Send + Sync;

    fn fit(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<Self::Params>;

    fn apply(&self, inputs: &FeatureInputs<'_>, params: &Self::Params) -> anyhow::Result<Column>;
}

/// Object-safe view of an [`Estimator`] with parameters held as JSON values.
pub(crate) trait DynEstimator: Send + Sync {
    fn fit_apply(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<(Column, serde_json::Value)>;

    fn apply_value(
        &self,
        inputs: &FeatureInputs<'_>,
        params: &serde_json::Value,
    ) -> anyhow::Result<Column>;
}

impl<E: Estimator> DynEstimator for E {
    fn fit_apply(&self, inputs: &FeatureInputs<'_>) -> anyhow::Result<(Column, serde_json::Value)> {
        let params = self.fit(inputs)?;
        let column = self.apply(inputs, &params)?;
        Ok((column, serde_json::to_value(&params)?))
    }

    fn apply_value(
        &self,
        inputs: &FeatureInputs<'_>,
        params: &serde_json::Value,
    ) -> anyhow::Result<Column> {
        let params: E::Params = serde_json::from_value(params.clone())?;
        self.apply(inputs, &params)
    }
}

#[derive(Clone)]
pub(crate) enum Compute {
    Stateless(Arc<ComputeFn>),
    Stateful(Arc<dyn DynEstimator>),
}

/// A named feature: its computation and the features it reads.
#[derive(Clone)]
pub struct FeatureDefinition {
    name: String,
    dependencies: Vec<String>,
    compute: Compute,
    position: usize,
}

impl FeatureDefinition {
    pub(crate) fn new(name: String, dependencies: &[&str], compute: Compute, position: usize) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if !deduped.iter().any(|d| d.as_str() == *dependency) {
                deduped.push(dependency.to_string());
            }
        }
        Self {
            name,
            dependencies: deduped,
            compute,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependencies, in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Whether the feature learns parameters during a fit
    pub fn is_stateful(&self) -> bool {
        matches!(self.compute, Compute::Stateful(_))
    }

    /// Registration index within the owning registry
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn compute(&self) -> &Compute {
        &self.compute
    }
}

impl fmt::Debug for FeatureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureDefinition")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("stateful", &self.is_stateful())
            .field("position", &self.position)
            .finish()
    }
}

/// What a feature computation can see: the raw dataset and the already
/// computed values of its declared dependencies.
///
/// Invocation tags are not visible here.
pub struct FeatureInputs<'a> {
    feature: &'a str,
    dataset: &'a Table,
    dependencies: &'a HashMap<String, Arc<Column>>,
}

impl<'a> FeatureInputs<'a> {
    pub(crate) fn new(
        feature: &'a str,
        dataset: &'a Table,
        dependencies: &'a HashMap<String, Arc<Column>>,
    ) -> Self {
        Self {
            feature,
            dataset,
            dependencies,
        }
    }

    /// Name of the feature being computed
    pub fn feature(&self) -> &str {
        self.feature
    }

    /// A raw column of the input dataset
    pub fn raw(&self, column: &str) -> Result<&'a Column, FrameError> {
        self.dataset.column(column)
    }

    /// The computed value of a declared dependency
    pub fn dependency(&self, name: &str) -> Result<&'a Column, FrameError> {
        self.dependencies
            .get(name)
            .map(|column| column.as_ref())
            .ok_or_else(|| FrameError::MissingColumn {
                name: name.to_string(),
            })
    }

    pub fn index(&self) -> &'a [i64] {
        self.dataset.index()
    }

    pub fn num_rows(&self) -> usize {
        self.dataset.num_rows()
    }
}
