// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Generator: resolves a feature request once, then computes it over datasets.
//!
//! ```rust
//! use std::sync::Arc;
//! use the_featurewood::{Column, Generator, Registry, Table, Tags};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut registry = Registry::new("demo");
//! registry
//!     .register("doubled", &[], |inputs| {
//!         let x = inputs.raw("x")?.as_int("x")?;
//!         Ok(Column::Int(x.iter().map(|v| v.map(|v| v * 2)).collect()))
//!     })
//!     .unwrap();
//!
//! let dataset = Table::with_default_index(2)
//!     .with_column("x", Column::Int(vec![Some(1), None]))
//!     .unwrap();
//!
//! let mut generator = Generator::new(Arc::new(registry), &["doubled"]).unwrap();
//! let features = generator.fit_transform(dataset, Tags::new()).await.unwrap();
//! assert_eq!(features.column("doubled"), Some(&Column::Int(vec![Some(2), None])));
//! # }
//! ```

mod result;
mod tags;

use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::GeneratorConfig;
use crate::engine::{ExecutionPlan, ExecutorFactory, FittedState, Mode, SequentialExecutor};
use crate::errors::{ExecutionError, ValidationError};
use crate::frame::Table;
use crate::observability::messages::generator::{
    InvocationCompleted, InvocationFailed, InvocationStarted,
};
use crate::observability::messages::StructuredLog;
use crate::registry::Registry;
use crate::traits::{ExecutionRequest, FeatureExecutor};

pub use result::{FeatureTable, Provenance};
pub use tags::Tags;

/// Computes a fixed list of requested features over datasets.
///
/// The request is resolved against the registry when the generator is built,
/// so unknown names and dependency cycles surface before any data is seen.
/// `fit_transform` learns parameters for stateful features and keeps them;
/// `transform` reuses them and fails with `NotFitted` if a stateful feature
/// has never been fitted.
pub struct Generator {
    registry: Arc<Registry>,
    plan: Arc<ExecutionPlan>,
    executor: Box<dyn FeatureExecutor>,
    state: Arc<FittedState>,
}

impl Generator {
    /// Resolve `features` against `registry` using the sequential executor.
    pub fn new<S: AsRef<str>>(
        registry: Arc<Registry>,
        features: &[S],
    ) -> Result<Self, ValidationError> {
        Self::with_executor(registry, features, Box::new(SequentialExecutor::new()))
    }

    pub fn with_executor<S: AsRef<str>>(
        registry: Arc<Registry>,
        features: &[S],
        executor: Box<dyn FeatureExecutor>,
    ) -> Result<Self, ValidationError> {
        let plan = ExecutionPlan::resolve(&registry, features)?;
        Ok(Self {
            registry,
            plan: Arc::new(plan),
            executor,
            state: Arc::new(FittedState::new()),
        })
    }

    /// Build a generator for the features and strategy named in `cfg`.
    pub fn from_config(
        registry: Arc<Registry>,
        cfg: &GeneratorConfig,
    ) -> Result<Self, ValidationError> {
        Self::with_executor(registry, &cfg.features, ExecutorFactory::from_config(cfg))
    }

    /// Replace the learned parameters, e.g. with ones persisted by an earlier
    /// process via [`FittedState::to_json`].
    pub fn with_fitted_state(mut self, state: FittedState) -> Self {
        self.state = Arc::new(state);
        self
    }

    /// Like [`Generator::with_fitted_state`], reading the state from JSON
    pub fn with_fitted_state_json(self, json: &str) -> Result<Self, ExecutionError> {
        let state = FittedState::from_json(json)?;
        Ok(self.with_fitted_state(state))
    }

    pub fn fitted_state(&self) -> &FittedState {
        &self.state
    }

    /// Serialize the learned parameters for storage outside the process
    pub fn export_fitted_state(&self) -> Result<String, ExecutionError> {
        Ok(self.state.to_json()?)
    }

    /// True once every stateful feature of the request has learned parameters
    pub fn is_fitted(&self) -> bool {
        self.first_unfitted().is_none()
    }

    pub fn requested(&self) -> &[String] {
        self.plan.requested()
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compute the request in fit mode.
    ///
    /// Stateful features learn parameters from `dataset` and apply them. The
    /// learned parameters replace earlier ones only if the whole invocation
    /// succeeds; on error the stored state is untouched.
    pub async fn fit_transform(
        &mut self,
        dataset: impl Into<Arc<Table>>,
        tags: Tags,
    ) -> Result<FeatureTable, ExecutionError> {
        let (features, learned) = self.invoke(dataset.into(), Mode::Fit, tags).await?;

        if !learned.is_empty() {
            let mut state = FittedState::clone(&self.state);
            state.merge(learned);
            self.state = Arc::new(state);
        }
        Ok(features)
    }

    /// Compute the request in transform mode using previously learned
    /// parameters.
    pub async fn transform(
        &self,
        dataset: impl Into<Arc<Table>>,
        tags: Tags,
    ) -> Result<FeatureTable, ExecutionError> {
        if let Some(feature) = self.first_unfitted() {
            let error = ExecutionError::NotFitted {
                feature: feature.to_string(),
            };
            InvocationFailed {
                mode: Mode::Transform.as_str(),
                error: &error,
            }
            .log();
            return Err(error);
        }

        let (features, _) = self.invoke(dataset.into(), Mode::Transform, tags).await?;
        Ok(features)
    }

    /// First stateful feature of the plan, in plan order, with no params
    fn first_unfitted(&self) -> Option<&str> {
        self.plan
            .stateful_features()
            .find(|name| !self.state.is_fitted(name))
    }

    async fn invoke(
        &self,
        dataset: Arc<Table>,
        mode: Mode,
        tags: Tags,
    ) -> Result<(FeatureTable, FittedState), ExecutionError> {
        let started = Instant::now();
        let tag_text = tags.to_string();
        let start_msg = InvocationStarted {
            registry: self.registry.name(),
            mode: mode.as_str(),
            tags: &tag_text,
            rows: dataset.num_rows(),
            feature_count: self.plan.len(),
        };
        let span = start_msg.span("generator_invocation");
        span.in_scope(|| start_msg.log());

        let result = self.execute(dataset, mode, tags).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok((features, learned)) => InvocationCompleted {
                mode: mode.as_str(),
                rows: features.table().num_rows(),
                columns: features.table().num_columns(),
                fitted_count: learned.len(),
                duration: started.elapsed(),
            }
            .log(),
            Err(error) => InvocationFailed {
                mode: mode.as_str(),
                error,
            }
            .log(),
        });

        result
    }

    async fn execute(
        &self,
        dataset: Arc<Table>,
        mode: Mode,
        tags: Tags,
    ) -> Result<(FeatureTable, FittedState), ExecutionError> {
        let request = ExecutionRequest {
            registry: Arc::clone(&self.registry),
            plan: Arc::clone(&self.plan),
            dataset: Arc::clone(&dataset),
            mode,
            fitted: Arc::clone(&self.state),
        };
        let outcome = self.executor.execute(request).await?;

        let mut table = Table::new(dataset.index().to_vec());
        for name in self.plan.requested() {
            let column = outcome
                .columns
                .get(name)
                .ok_or_else(|| ExecutionError::InternalError {
                    message: format!("Requested feature '{}' was not computed", name),
                })?;
            table
                .insert_column(name.clone(), column.as_ref().clone())
                .map_err(|e| ExecutionError::InternalError {
                    message: format!("Failed to assemble feature table: {}", e),
                })?;
        }

        let provenance = Provenance {
            registry: self.registry.name().to_string(),
            mode,
            tags,
            resolved_order: self.plan.order().to_vec(),
            fitted: outcome.learned.features().map(str::to_string).collect(),
        };

        Ok((FeatureTable::new(table, provenance), outcome.learned))
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("registry", &self.registry.name())
            .field("requested", &self.plan.requested())
            .field("strategy", &self.executor.strategy())
            .field("fitted", &self.state.len())
            .finish()
    }
}
