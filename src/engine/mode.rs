// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invocation mode of a generator call.
///
/// In `Fit` stateful features learn parameters from the data they see; in
/// `Transform` they reapply parameters learned by an earlier fit. Stateless
/// features behave the same in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Fit,
    Transform,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Fit => "fit",
            Mode::Transform => "transform",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
