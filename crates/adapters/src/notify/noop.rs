// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notifier for when alert delivery is disabled.

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use sw_core::Alert;

/// Notifier that only logs.
///
/// Used with `transport = "none"`; the alert still shows up in the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        tracing::info!(store = %alert.store, items = %alert.summary(), "alert not delivered (transport = none)");
        Ok(())
    }
}
