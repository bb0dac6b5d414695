// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! sw-core: pure logic for the stockwatch daemon
//!
//! This crate provides:
//! - Configuration loading and validation
//! - The per-target watch state machine
//! - FIFO admission bookkeeping for the shared page pool
//! - Evaluation of extracted product data
//!
//! Nothing in here performs I/O beyond reading the config file.

pub mod admission;
pub mod alert;
pub mod clock;
pub mod config;
pub mod evaluate;
pub mod product;
pub mod snapshot;
pub mod watch;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use admission::{Admission, AdmissionQueue, Ticket, TicketId};
pub use alert::Alert;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    Config, ConfigError, GlobalConfig, LocatorRole, Locators, NotifyConfig, OutOfStockMatcher,
    TargetConfig, Transport,
};
pub use evaluate::{evaluate, parse_price, qualifies, CheckClass, CheckOutcome};
pub use product::{FieldError, ProductRecord, RawItem};
pub use snapshot::screenshot_path;
pub use watch::{
    BackoffKind, Cadence, LogLevel, PageId, ShotKind, Watch, WatchEffect, WatchEvent, WatchPhase,
};
