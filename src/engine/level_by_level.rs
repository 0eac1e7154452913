// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::engine::compute::panic_error;
use crate::engine::{compute_feature, ComputedFeature, ExecutionOutcome, Invocation};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{
    DependencyLevelStarted, PlanExecutionCompleted, PlanExecutionStarted,
};
use crate::observability::messages::feature::FeatureFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::executor::{ExecutionRequest, FeatureExecutor};

/// Level-by-Level executor that computes the plan in dependency levels.
///
/// ## Execution Strategy
///
/// 1. **Level Computation**: the plan is grouped into levels; level 0 holds
///    features with no dependencies, level N features whose deepest dependency
///    is at level N-1
/// 2. **Concurrent Level Execution**: every feature of a level is computed on
///    tokio's blocking pool, at most `max_concurrency` at a time
/// 3. **Level Barrier**: all tasks of a level are joined and their columns
///    cached before the next level starts, so a dependent only ever reads
///    finished columns
///
/// Results are cached in plan order regardless of which task finished first,
/// so the outcome is identical to [`SequentialExecutor`](super::SequentialExecutor).
///
/// ## Failure Handling
/// The first failed feature (in plan order within its level) aborts the
/// invocation. A panic is reported as that feature's `Computation` error, the
/// same as with the sequential executor. Tasks already running for that level
/// are left to finish and their output is discarded.
#[derive(Debug)]
pub struct LevelByLevelExecutor {
    /// Maximum number of concurrent feature computations within a level
    max_concurrency: usize,
}

impl LevelByLevelExecutor {
    /// Create a new Level-by-Level executor with the specified concurrency limit
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Compute every feature of one level concurrently and cache the results.
    async fn execute_level(
        &self,
        level: &[String],
        request: &ExecutionRequest,
        invocation: &mut Invocation,
        semaphore: &Arc<Semaphore>,
    ) -> Result<(), ExecutionError> {
        let mut tasks = Vec::with_capacity(level.len());

        for feature in level {
            let definition = request.registry.lookup(feature)?;
            let dependencies = invocation.begin(feature, definition.dependencies())?;

            let permit = semaphore.clone().acquire_owned().await.map_err(|e| {
                ExecutionError::InternalError {
                    message: format!(
                        "Failed to acquire semaphore permit for feature '{}': {}",
                        feature, e
                    ),
                }
            })?;

            let registry = Arc::clone(&request.registry);
            let dataset = Arc::clone(&request.dataset);
            let fitted = Arc::clone(&request.fitted);
            let mode = request.mode;
            let feature_clone = feature.clone();

            let task = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let definition = registry.lookup(&feature_clone)?;
                compute_feature(definition, &dataset, &dependencies, mode, &fitted)
            });

            tasks.push((feature, task));
        }

        // Join in plan order so failures and cache writes are deterministic
        let mut finished: Vec<(&String, ComputedFeature)> = Vec::with_capacity(tasks.len());
        for (feature, task) in tasks {
            match task.await {
                Ok(Ok(computed)) => finished.push((feature, computed)),
                Ok(Err(e)) => return Err(e),
                Err(join_error) if join_error.is_panic() => {
                    let source = panic_error(join_error.into_panic().as_ref());
                    FeatureFailed {
                        feature,
                        mode: request.mode.as_str(),
                        error: &*source,
                    }
                    .log();
                    return Err(ExecutionError::Computation {
                        feature: feature.clone(),
                        mode: request.mode,
                        source,
                    });
                }
                Err(join_error) => {
                    return Err(ExecutionError::InternalError {
                        message: format!(
                            "Task for feature '{}' failed to join: {}",
                            feature, join_error
                        ),
                    });
                }
            }
        }

        for (feature, computed) in finished {
            invocation.complete(feature, computed)?;
        }

        Ok(())
    }
}

impl Default for LevelByLevelExecutor {
    /// Concurrency defaults to the number of available CPU cores
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }
}

#[async_trait]
impl FeatureExecutor for LevelByLevelExecutor {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError> {
        let started = Instant::now();
        PlanExecutionStarted {
            strategy: self.strategy(),
            mode: request.mode.as_str(),
            feature_count: request.plan.len(),
            max_concurrency: self.max_concurrency,
        }
        .log();

        let levels = request.plan.levels();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut invocation = Invocation::new(&request.plan, request.mode);

        for (index, level) in levels.iter().enumerate() {
            DependencyLevelStarted {
                level: index,
                level_count: levels.len(),
                features: level,
            }
            .log();
            self.execute_level(level, &request, &mut invocation, &semaphore)
                .await?;
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
        "level"
    }
}
