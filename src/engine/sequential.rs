// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Instant;

use crate::engine::{compute_feature, ExecutionOutcome, Invocation};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{PlanExecutionCompleted, PlanExecutionStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::executor::{ExecutionRequest, FeatureExecutor};

/// Computes the plan one feature at a time, in plan order, on the calling task.
///
/// This is the default executor. The plan order puts every dependency before
/// its dependents, so each feature finds its inputs already cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FeatureExecutor for SequentialExecutor {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError> {
        let started = Instant::now();
        PlanExecutionStarted {
            strategy: self.strategy(),
            mode: request.mode.as_str(),
            feature_count: request.plan.len(),
            max_concurrency: 1,
        }
        .log();

        let mut invocation = Invocation::new(&request.plan, request.mode);

        for feature in request.plan.order() {
            let definition = request.registry.lookup(feature)?;
            let dependencies = invocation.begin(feature, definition.dependencies())?;
            let computed = compute_feature(
                definition,
                &request.dataset,
                &dependencies,
                request.mode,
                &request.fitted,
            )?;
            invocation.complete(feature, computed)?;
        }

        let outcome = invocation.finish()?;

        PlanExecutionCompleted {
            strategy: self.strategy(),
            mode: request.mode.as_str(),
            computed: outcome.columns.len(),
            fitted: outcome.learned.len(),
            duration: started.elapsed(),
        }
        .log();

        Ok(outcome)
    }

    fn strategy(&self) -> &'static str {
        "sequential"
    }
}
