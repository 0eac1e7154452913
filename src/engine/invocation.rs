// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{ComputedFeature, ExecutionPlan, FittedState, Mode};
use crate::errors::ExecutionError;
use crate::frame::Column;

/// Progress of one feature within one invocation.
///
/// `Pending -> Resolving -> Computed`, never backwards. A fresh invocation
/// starts every feature at `Pending` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStatus {
    Pending,
    /// Dependencies gathered, computation in flight
    Resolving,
    /// Output cached for the rest of the invocation
    Computed,
}

/// Per-invocation bookkeeping: feature statuses, the column cache, and
/// parameters learned so far.
///
/// Executors drive every feature through [`Invocation::begin`] and
/// [`Invocation::complete`], which is what guarantees each feature computes
/// exactly once per call.
#[derive(Debug)]
pub struct Invocation {
    mode: Mode,
    statuses: HashMap<String, FeatureStatus>,
    cache: HashMap<String, Arc<Column>>,
    learned: FittedState,
}

impl Invocation {
    pub fn new(plan: &ExecutionPlan, mode: Mode) -> Self {
        Self {
            mode,
            statuses: plan
                .order()
                .iter()
                .map(|name| (name.clone(), FeatureStatus::Pending))
                .collect(),
            cache: HashMap::with_capacity(plan.len()),
            learned: FittedState::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self, feature: &str) -> Option<FeatureStatus> {
        self.statuses.get(feature).copied()
    }

    /// Move a feature from `Pending` to `Resolving` and hand back its cached
    /// dependency columns.
    pub fn begin(
        &mut self,
        feature: &str,
        dependencies: &[String],
    ) -> Result<HashMap<String, Arc<Column>>, ExecutionError> {
        self.transition(feature, FeatureStatus::Pending, FeatureStatus::Resolving)?;

        dependencies
            .iter()
            .map(|dependency| {
                self.cache
                    .get(dependency)
                    .map(|column| (dependency.clone(), Arc::clone(column)))
                    .ok_or_else(|| ExecutionError::InternalError {
                        message: format!(
                            "Feature '{}' started before its dependency '{}' was computed",
                            feature, dependency
                        ),
                    })
            })
            .collect()
    }

    /// Move a feature from `Resolving` to `Computed` and cache its output.
    pub fn complete(&mut self, feature: &str, computed: ComputedFeature) -> Result<(), ExecutionError> {
        self.transition(feature, FeatureStatus::Resolving, FeatureStatus::Computed)?;

        if let Some(params) = computed.learned {
            self.learned.insert(feature, params);
        }
        self.cache.insert(feature.to_string(), Arc::new(computed.column));
        Ok(())
    }

    fn transition(
        &mut self,
        feature: &str,
        from: FeatureStatus,
        to: FeatureStatus,
    ) -> Result<(), ExecutionError> {
        let status = self
            .statuses
            .get_mut(feature)
            .ok_or_else(|| ExecutionError::InternalError {
                message: format!("Feature '{}' is not part of this invocation", feature),
            })?;

        if *status != from {
            return Err(ExecutionError::InternalError {
                message: format!(
                    "Feature '{}' cannot move from {:?} to {:?} (currently {:?})",
                    feature, from, to, status
                ),
            });
        }
        *status = to;
        Ok(())
    }

    /// Close the invocation, handing back computed columns and learned params.
    ///
    /// Fails if any feature of the plan was left uncomputed.
    pub fn finish(self) -> Result<ExecutionOutcome, ExecutionError> {
        if let Some((feature, status)) = self
            .statuses
            .iter()
            .find(|(_, status)| **status != FeatureStatus::Computed)
        {
            return Err(ExecutionError::InternalError {
                message: format!("Feature '{}' finished the invocation as {:?}", feature, status),
            });
        }

        Ok(ExecutionOutcome {
            columns: self.cache,
            learned: self.learned,
        })
    }
}

/// Everything an executor produced for one invocation.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// Every feature of the plan, by name
    pub columns: HashMap<String, Arc<Column>>,
    /// Params learned during a fit, empty for transforms
    pub learned: FittedState,
}
