// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Columnar, row-indexed tables used as generator input and output.

mod column;
mod table;

pub use column::Column;
pub use table::Table;
