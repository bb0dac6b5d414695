// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the watch runtime

use thiserror::Error;

/// Errors that stop a watch or the supervisor
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("tab pool dropped the request from {store}")]
    PoolClosed { store: String },
    #[error("a check for {store} is already in flight ({phase})")]
    CheckInFlight { store: String, phase: String },
    #[error("watch for {store} stalled in phase {phase}")]
    Stalled { store: String, phase: String },
    #[error("every target is disabled")]
    NoEnabledTargets,
}
