mod compute;
mod invocation;
pub mod factory;
pub mod level_by_level;
mod mode;
mod plan;
pub mod sequential;
mod state;

pub use compute::{compute_feature, ComputedFeature};
pub use factory::ExecutorFactory;
pub use invocation::{ExecutionOutcome, FeatureStatus, Invocation};
pub use level_by_level::LevelByLevelExecutor;
pub use mode::Mode;
pub use plan::ExecutionPlan;
pub use sequential::SequentialExecutor;
pub use state::FittedState;
