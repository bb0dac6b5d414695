// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starts one watch per enabled target and keeps them running

use crate::error::RuntimeError;
use crate::pool::{PoolStats, TabPool};
use crate::runner::{WatchDeps, WatchRunner};
use std::sync::Arc;
use sw_adapters::{Notifier, PageLoader};
use sw_core::{Clock, Config};
use tokio::task::JoinSet;

/// Owns the shared pool and the watch tasks
pub struct Supervisor<L, N, C> {
    config: Arc<Config>,
    loader: L,
    notifier: N,
    clock: C,
    pool: TabPool,
}

impl<L, N, C> Supervisor<L, N, C>
where
    L: PageLoader,
    N: Notifier,
    C: Clock,
{
    pub fn new(config: Config, loader: L, notifier: N, clock: C) -> Self {
        let pool = TabPool::new(config.global.max_tabs);
        Self {
            config: Arc::new(config),
            loader,
            notifier,
            clock,
            pool,
        }
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Spawn a watch for every enabled target, staggered by file position.
    ///
    /// Returns how many watches were started.
    pub fn spawn_all(&self, tasks: &mut JoinSet<Result<(), RuntimeError>>) -> usize {
        let stagger = self.config.global.stagger;
        let mut started = 0;

        for (index, target) in self.config.targets.iter().enumerate() {
            if self.config.is_disabled(&target.store) {
                tracing::info!(store = %target.store, "target disabled, not watching");
                continue;
            }
            if let Some(max_tabs) = target.max_tabs {
                tracing::warn!(
                    store = %target.store,
                    max_tabs,
                    global = self.config.global.max_tabs,
                    "per-target max_tabs is ignored; the global ceiling applies"
                );
            }

            let delay = stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            let runner = WatchRunner::new(
                Arc::clone(&self.config),
                target.clone(),
                WatchDeps {
                    loader: self.loader.clone(),
                    notifier: self.notifier.clone(),
                    pool: self.pool.clone(),
                    clock: self.clock.clone(),
                },
            );
            let store = target.store.clone();
            tasks.spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                tracing::info!(%store, "watch started");
                runner.run_forever().await
            });
            started += 1;
        }
        started
    }

    /// Run every watch until they all stop
    pub async fn run(&self) -> Result<(), RuntimeError> {
        let mut tasks = JoinSet::new();
        let started = self.spawn_all(&mut tasks);
        if started == 0 {
            return Err(RuntimeError::NoEnabledTargets);
        }
        tracing::info!(
            watches = started,
            max_tabs = self.config.global.max_tabs,
            "supervisor running"
        );

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "watch stopped"),
                Err(e) => tracing::error!(error = %e, "watch task panicked or was cancelled"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
