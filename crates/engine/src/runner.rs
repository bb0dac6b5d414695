// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes a watch's effects against the real adapters

use crate::error::RuntimeError;
use crate::pool::{Slot, TabPool};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use sw_adapters::{Notifier, PageLoader};
use sw_core::{
    evaluate, screenshot_path, Alert, CheckClass, Clock, Config, LogLevel, TargetConfig, Watch,
    WatchEffect, WatchEvent, WatchPhase,
};

/// Adapters and shared resources a watch needs
#[derive(Clone)]
pub struct WatchDeps<L, N, C> {
    pub loader: L,
    pub notifier: N,
    pub pool: TabPool,
    pub clock: C,
}

/// Result of one completed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub class: CheckClass,
    /// Time until the next check
    pub delay: Duration,
    /// Items included in an alert, if one was sent
    pub notified: usize,
}

/// Drives one target's [`Watch`] forever
pub struct WatchRunner<L, N, C: Clock> {
    config: Arc<Config>,
    target: TargetConfig,
    deps: WatchDeps<L, N, C>,
    watch: Watch,
    slot: Option<Slot>,
}

impl<L, N, C> WatchRunner<L, N, C>
where
    L: PageLoader,
    N: Notifier,
    C: Clock,
{
    pub fn new(config: Arc<Config>, target: TargetConfig, deps: WatchDeps<L, N, C>) -> Self {
        let watch = Watch::for_target(&target, &config.global);
        Self {
            config,
            target,
            deps,
            watch,
            slot: None,
        }
    }

    pub fn watch(&self) -> &Watch {
        &self.watch
    }

    /// Check, back off, check again; only returns on a runtime error
    pub async fn run_forever(mut self) -> Result<(), RuntimeError> {
        loop {
            let report = self.run_once().await?;
            tracing::info!(
                store = %self.target.store,
                outcome = report.class.as_str(),
                delay_secs = report.delay.as_secs(),
                checks = self.watch.checks,
                "next check scheduled"
            );
            tokio::time::sleep(report.delay).await;
        }
    }

    /// Run a single check from slot request to armed timer
    pub async fn run_once(&mut self) -> Result<CheckReport, RuntimeError> {
        let start = match self.watch.phase {
            WatchPhase::Idle => WatchEvent::Activate,
            WatchPhase::Backoff(_) => WatchEvent::TimerFired,
            phase => {
                return Err(RuntimeError::CheckInFlight {
                    store: self.target.store.clone(),
                    phase: phase.to_string(),
                })
            }
        };

        let mut notified = 0;
        let mut events = VecDeque::from([start]);
        while let Some(event) = events.pop_front() {
            let (next, effects) = self.watch.transition(event, &self.deps.clock);
            self.watch = next;

            let mut armed = None;
            for effect in effects {
                match effect {
                    WatchEffect::ArmTimer { delay } => armed = Some(delay),
                    WatchEffect::Notify { items } => {
                        notified = items.len();
                        self.notify(items).await;
                    }
                    other => events.extend(self.execute(other).await?),
                }
            }

            if let Some(delay) = armed {
                return Ok(CheckReport {
                    class: self.watch.last.unwrap_or(CheckClass::Failed),
                    delay,
                    notified,
                });
            }
        }

        Err(RuntimeError::Stalled {
            store: self.target.store.clone(),
            phase: self.watch.phase.to_string(),
        })
    }

    /// Perform one effect, returning the event it produced
    async fn execute(&mut self, effect: WatchEffect) -> Result<Option<WatchEvent>, RuntimeError> {
        let global = &self.config.global;
        let loader = &self.deps.loader;

        let event = match effect {
            WatchEffect::AcquireSlot => {
                self.slot = Some(self.deps.pool.acquire(&self.target.store).await?);
                Some(WatchEvent::SlotGranted)
            }
            WatchEffect::OpenPage => Some(match loader.open().await {
                Ok(page) => WatchEvent::PageOpened { page },
                Err(e) => WatchEvent::LoadFailed {
                    reason: e.to_string(),
                },
            }),
            WatchEffect::Navigate { page } => Some(
                match loader
                    .navigate(page, &self.target.url, global.navigation_timeout)
                    .await
                {
                    Ok(()) => WatchEvent::Navigated,
                    Err(e) => WatchEvent::NavigationFailed {
                        reason: e.to_string(),
                    },
                },
            ),
            WatchEffect::WaitForSelectors { page } => {
                let selectors = self.target.locators.ready_selectors();
                Some(
                    match loader
                        .wait_for_selectors(page, &selectors, global.selector_timeout)
                        .await
                    {
                        Ok(()) => WatchEvent::SelectorsReady,
                        Err(e) => WatchEvent::LoadFailed {
                            reason: e.to_string(),
                        },
                    },
                )
            }
            WatchEffect::Extract { page } => Some(
                match loader.extract(page, &self.target.locators).await {
                    Ok(items) => WatchEvent::Evaluated {
                        outcome: evaluate(&self.target, global, items),
                    },
                    Err(e) => WatchEvent::LoadFailed {
                        reason: e.to_string(),
                    },
                },
            ),
            WatchEffect::Screenshot { page, kind } => {
                let base = screenshot_path(
                    &global.screenshot_dir,
                    kind,
                    &self.target.store,
                    chrono::Local::now(),
                );
                // A capture is best effort.
                if let Err(e) = loader.screenshot(page, &base).await {
                    tracing::warn!(store = %self.target.store, %page, error = %e, "capture failed");
                }
                None
            }
            WatchEffect::ClosePage { page } => {
                if let Some(page) = page {
                    if let Err(e) = loader.close(page).await {
                        tracing::warn!(store = %self.target.store, %page, error = %e, "page close failed");
                    }
                }
                self.slot = None;
                None
            }
            WatchEffect::Log { level, message } => {
                let store = self.target.store.as_str();
                match level {
                    LogLevel::Info => tracing::info!(store, "{}", message),
                    LogLevel::Warn => tracing::warn!(store, "{}", message),
                    LogLevel::Error => tracing::error!(store, "{}", message),
                }
                None
            }
            WatchEffect::Notify { .. } | WatchEffect::ArmTimer { .. } => None,
        };
        Ok(event)
    }

    async fn notify(&self, items: Vec<sw_core::ProductRecord>) {
        let alert = Alert::new(
            self.target.store.clone(),
            self.config.notify.recipients.clone(),
            items,
        );
        tracing::info!(store = %alert.store, items = %alert.summary(), "in stock");
        if let Err(e) = self.deps.notifier.notify(&alert).await {
            tracing::error!(store = %alert.store, error = %e, "alert not delivered");
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
