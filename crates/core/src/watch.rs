// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch state machine: one per target
//!
//! A watch cycles forever through
//! `Acquiring -> Loading -> Evaluating -> Backoff -> Acquiring`. Each
//! transition is pure and returns the effects the runner must perform, in
//! order. The machine accepts exactly one event per phase step, so a target
//! can never have two checks in flight.

use crate::clock::Clock;
use crate::config::{GlobalConfig, TargetConfig};
use crate::evaluate::{CheckClass, CheckOutcome};
use crate::product::ProductRecord;
use std::fmt;
use std::time::{Duration, Instant};

/// Handle to an open page owned by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page-{}", self.0)
    }
}

/// Why a watch is waiting for its next check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackoffKind {
    Error,
    Empty,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    /// Not yet activated
    Idle,
    /// Waiting for a pool slot
    Acquiring,
    /// Slot held; opening the page and waiting for it to become ready
    Loading,
    /// Page ready; items being extracted and classified
    Evaluating,
    /// Page closed; timer armed
    Backoff(BackoffKind),
}

impl fmt::Display for WatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchPhase::Idle => f.write_str("idle"),
            WatchPhase::Acquiring => f.write_str("acquiring"),
            WatchPhase::Loading => f.write_str("loading"),
            WatchPhase::Evaluating => f.write_str("evaluating"),
            WatchPhase::Backoff(BackoffKind::Error) => f.write_str("error-backoff"),
            WatchPhase::Backoff(BackoffKind::Empty) => f.write_str("empty-backoff"),
            WatchPhase::Backoff(BackoffKind::Success) => f.write_str("success-backoff"),
        }
    }
}

/// Diagnostic capture tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotKind {
    Error,
    Success,
}

impl ShotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotKind::Error => "error",
            ShotKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Inputs that drive a watch
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    Activate,
    SlotGranted,
    PageOpened { page: PageId },
    Navigated,
    /// Navigation did not settle in time; tolerated
    NavigationFailed { reason: String },
    SelectorsReady,
    /// The page never became usable
    LoadFailed { reason: String },
    Evaluated { outcome: CheckOutcome },
    TimerFired,
}

impl WatchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WatchEvent::Activate => "activate",
            WatchEvent::SlotGranted => "slot-granted",
            WatchEvent::PageOpened { .. } => "page-opened",
            WatchEvent::Navigated => "navigated",
            WatchEvent::NavigationFailed { .. } => "navigation-failed",
            WatchEvent::SelectorsReady => "selectors-ready",
            WatchEvent::LoadFailed { .. } => "load-failed",
            WatchEvent::Evaluated { .. } => "evaluated",
            WatchEvent::TimerFired => "timer-fired",
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEffect {
    AcquireSlot,
    OpenPage,
    Navigate { page: PageId },
    WaitForSelectors { page: PageId },
    Extract { page: PageId },
    Notify { items: Vec<ProductRecord> },
    Screenshot { page: PageId, kind: ShotKind },
    /// Close the page (if one was opened) and give the slot back
    ClosePage { page: Option<PageId> },
    ArmTimer { delay: Duration },
    Log { level: LogLevel, message: String },
}

/// Backoff delays per outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub error: Duration,
    pub empty: Duration,
    pub success: Duration,
}

impl Cadence {
    pub fn for_target(target: &TargetConfig, global: &GlobalConfig) -> Self {
        Self {
            error: global.error_retry,
            empty: target.refresh_interval(global),
            success: global.success_retry,
        }
    }

    pub fn delay(&self, kind: BackoffKind) -> Duration {
        match kind {
            BackoffKind::Error => self.error,
            BackoffKind::Empty => self.empty,
            BackoffKind::Success => self.success,
        }
    }
}

/// Per-target scheduler state
#[derive(Debug, Clone)]
pub struct Watch {
    pub store: String,
    pub cadence: Cadence,
    pub phase: WatchPhase,
    /// Page opened for the current check
    pub page: Option<PageId>,
    pub last: Option<CheckClass>,
    pub next_check_at: Option<Instant>,
    /// Completed checks
    pub checks: u64,
}

impl Watch {
    pub fn new(store: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            store: store.into(),
            cadence,
            phase: WatchPhase::Idle,
            page: None,
            last: None,
            next_check_at: None,
            checks: 0,
        }
    }

    pub fn for_target(target: &TargetConfig, global: &GlobalConfig) -> Self {
        Self::new(target.store.clone(), Cadence::for_target(target, global))
    }

    /// True between slot request and page close
    pub fn check_in_flight(&self) -> bool {
        matches!(
            self.phase,
            WatchPhase::Acquiring | WatchPhase::Loading | WatchPhase::Evaluating
        )
    }

    /// Pure state transition function
    pub fn transition(&self, event: WatchEvent, clock: &impl Clock) -> (Watch, Vec<WatchEffect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match (self.phase, event) {
            (WatchPhase::Idle, WatchEvent::Activate)
            | (WatchPhase::Backoff(_), WatchEvent::TimerFired) => {
                next.phase = WatchPhase::Acquiring;
                next.next_check_at = None;
                effects.push(WatchEffect::AcquireSlot);
            }

            (WatchPhase::Acquiring, WatchEvent::SlotGranted) => {
                next.phase = WatchPhase::Loading;
                effects.push(WatchEffect::OpenPage);
            }

            (WatchPhase::Loading, WatchEvent::PageOpened { page }) if self.page.is_none() => {
                next.page = Some(page);
                effects.push(WatchEffect::Navigate { page });
            }

            (WatchPhase::Loading, WatchEvent::Navigated) => {
                if let Some(page) = self.page {
                    effects.push(WatchEffect::WaitForSelectors { page });
                }
            }

            (WatchPhase::Loading, WatchEvent::NavigationFailed { reason }) => {
                if let Some(page) = self.page {
                    effects.push(WatchEffect::Log {
                        level: LogLevel::Warn,
                        message: format!("navigation did not settle: {}", reason),
                    });
                    effects.push(WatchEffect::WaitForSelectors { page });
                }
            }

            (WatchPhase::Loading, WatchEvent::SelectorsReady) => {
                if let Some(page) = self.page {
                    next.phase = WatchPhase::Evaluating;
                    effects.push(WatchEffect::Extract { page });
                }
            }

            (WatchPhase::Loading | WatchPhase::Evaluating, WatchEvent::LoadFailed { reason }) => {
                effects.push(WatchEffect::Log {
                    level: LogLevel::Error,
                    message: format!("page load failed: {}", reason),
                });
                if let Some(page) = self.page {
                    effects.push(WatchEffect::Screenshot {
                        page,
                        kind: ShotKind::Error,
                    });
                }
                next.back_off(CheckClass::Failed, &mut effects, clock);
            }

            (WatchPhase::Evaluating, WatchEvent::Evaluated { outcome }) => {
                let class = outcome.class();
                match class {
                    CheckClass::Failed => {
                        let summary = outcome
                            .errors
                            .iter()
                            .map(|r| r.error_summary())
                            .collect::<Vec<_>>()
                            .join("; ");
                        effects.push(WatchEffect::Log {
                            level: LogLevel::Error,
                            message: format!(
                                "{} of {} record(s) had errors: {}",
                                outcome.errors.len(),
                                outcome.evaluated,
                                summary
                            ),
                        });
                        if let Some(page) = self.page {
                            effects.push(WatchEffect::Screenshot {
                                page,
                                kind: ShotKind::Error,
                            });
                        }
                    }
                    CheckClass::Empty => {}
                    CheckClass::InStock => {
                        effects.push(WatchEffect::Notify {
                            items: outcome.in_stock,
                        });
                        if let Some(page) = self.page {
                            effects.push(WatchEffect::Screenshot {
                                page,
                                kind: ShotKind::Success,
                            });
                        }
                    }
                }
                next.back_off(class, &mut effects, clock);
            }

            (phase, event) => {
                tracing::warn!(
                    store = %self.store,
                    %phase,
                    event = event.name(),
                    "ignoring event not valid in this phase"
                );
            }
        }

        (next, effects)
    }

    /// Close the page, record the result, and arm the next check
    fn back_off(&mut self, class: CheckClass, effects: &mut Vec<WatchEffect>, clock: &impl Clock) {
        let kind = match class {
            CheckClass::Failed => BackoffKind::Error,
            CheckClass::Empty => BackoffKind::Empty,
            CheckClass::InStock => BackoffKind::Success,
        };
        let delay = self.cadence.delay(kind);

        effects.push(WatchEffect::ClosePage {
            page: self.page.take(),
        });
        effects.push(WatchEffect::ArmTimer { delay });

        self.phase = WatchPhase::Backoff(kind);
        self.last = Some(class);
        self.next_check_at = clock.after(delay);
        self.checks += 1;
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
