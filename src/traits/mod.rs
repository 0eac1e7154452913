pub mod executor;

pub use executor::{ExecutionRequest, FeatureExecutor};
