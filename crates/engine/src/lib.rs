// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Stockwatch watch engine: tab pool, per-target runners and the supervisor

mod error;
mod pool;
mod runner;
mod supervisor;

pub use error::RuntimeError;
pub use pool::{PoolStats, Slot, TabPool};
pub use runner::{CheckReport, WatchDeps, WatchRunner};
pub use supervisor::Supervisor;
