// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod frame;
mod validation;

pub use config::ConfigError;
pub use execution::ExecutionError;
pub use frame::FrameError;
pub use validation::ValidationError;
