use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{ExecutionOutcome, ExecutionPlan, FittedState, Mode};
use crate::errors::ExecutionError;
use crate::frame::Table;
use crate::registry::Registry;

/// Everything an executor needs for one invocation.
///
/// All shared inputs are behind `Arc` so executors can hand them to worker
/// tasks without cloning the dataset.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub registry: Arc<Registry>,
    pub plan: Arc<ExecutionPlan>,
    pub dataset: Arc<Table>,
    pub mode: Mode,
    /// Params from earlier fits; read by stateful features in transform mode
    pub fitted: Arc<FittedState>,
}

#[async_trait]
pub trait FeatureExecutor: Send + Sync {
    /// Compute every feature of `request.plan` over `request.dataset`.
    ///
    /// Returns a Result containing either:
    /// - Ok(ExecutionOutcome): every feature's column plus any params learned
    /// - Err(ExecutionError): the first failure; nothing partial is returned
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutcome, ExecutionError>;

    /// Strategy name for logs
    fn strategy(&self) -> &'static str;
}
