// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{GeneratorConfig, Strategy, DEFAULT_MAX_CONCURRENCY};
use crate::engine::level_by_level::LevelByLevelExecutor;
use crate::engine::sequential::SequentialExecutor;
use crate::traits::FeatureExecutor;

/// Factory for creating feature executors from configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create an executor based on the configuration strategy
    pub fn from_config(cfg: &GeneratorConfig) -> Box<dyn FeatureExecutor> {
        match cfg.strategy {
            Strategy::Sequential => Box::new(SequentialExecutor::new()),
            Strategy::Level => {
                let max_concurrency = cfg.executor_options.max_concurrency.unwrap_or_else(|| {
                    std::thread::available_parallelism()
                        .map(|n| n.get())
                        .unwrap_or(DEFAULT_MAX_CONCURRENCY)
                });
                Box::new(LevelByLevelExecutor::new(max_concurrency))
            }
        }
    }
}
