// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake page loader for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PageError, PageLoader};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use sw_core::{Locators, PageId, RawItem};

/// Recorded page operation
#[derive(Debug, Clone, PartialEq)]
pub enum PageCall {
    Open { page: PageId },
    Navigate { page: PageId, url: String },
    WaitForSelectors { page: PageId, selectors: Vec<String> },
    Extract { page: PageId },
    Screenshot { page: PageId, path: PathBuf },
    Close { page: PageId },
}

/// Scripted behaviour for one URL
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    /// Make navigation fail with this reason
    pub navigation_error: Option<String>,
    /// Whether the ready selectors ever appear
    pub ready: bool,
    pub items: Vec<RawItem>,
    /// Simulated network time, spent in `navigate`
    pub latency: Duration,
    /// Make `screenshot` fail with this reason
    pub capture_error: Option<String>,
}

impl FakePage {
    /// A page that loads and shows `items`
    pub fn with_items(items: Vec<RawItem>) -> Self {
        Self {
            ready: true,
            items,
            ..Self::default()
        }
    }

    /// Navigation times out and nothing ever shows up
    pub fn unreachable() -> Self {
        Self {
            navigation_error: Some("navigation timeout".to_string()),
            ..Self::default()
        }
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[derive(Default)]
struct FakeState {
    scripts: HashMap<String, FakePage>,
    open: HashMap<PageId, Option<String>>,
    next_id: u64,
    max_open: usize,
    calls: Vec<PageCall>,
}

/// Fake page loader for testing
#[derive(Clone, Default)]
pub struct FakePageLoader {
    state: Arc<Mutex<FakeState>>,
}

impl FakePageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script what `url` returns; unscripted URLs load but never become ready
    pub fn set_page(&self, url: impl Into<String>, page: FakePage) {
        self.state().scripts.insert(url.into(), page);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PageCall> {
        self.state().calls.clone()
    }

    /// Pages currently open
    pub fn open_pages(&self) -> usize {
        self.state().open.len()
    }

    /// Most pages that were ever open at once
    pub fn max_open(&self) -> usize {
        self.state().max_open
    }

    /// URLs navigated to, in order
    pub fn navigations(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                PageCall::Navigate { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `screenshot`, with the extension added
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                PageCall::Screenshot { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Script for whatever URL `page` was pointed at
    fn script(&self, page: PageId) -> Result<FakePage, PageError> {
        let state = self.state();
        let url = state.open.get(&page).ok_or(PageError::UnknownPage(page))?;
        Ok(url
            .as_ref()
            .and_then(|url| state.scripts.get(url))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl PageLoader for FakePageLoader {
    async fn open(&self) -> Result<PageId, PageError> {
        let mut state = self.state();
        state.next_id += 1;
        let page = PageId(state.next_id);
        state.open.insert(page, None);
        state.max_open = state.max_open.max(state.open.len());
        state.calls.push(PageCall::Open { page });
        Ok(page)
    }

    async fn navigate(&self, page: PageId, url: &str, _timeout: Duration) -> Result<(), PageError> {
        {
            let mut state = self.state();
            state.calls.push(PageCall::Navigate {
                page,
                url: url.to_string(),
            });
            let slot = state
                .open
                .get_mut(&page)
                .ok_or(PageError::UnknownPage(page))?;
            *slot = Some(url.to_string());
        }

        let script = self.script(page)?;
        if !script.latency.is_zero() {
            tokio::time::sleep(script.latency).await;
        }
        match script.navigation_error {
            Some(reason) => Err(PageError::Navigation {
                url: url.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    async fn wait_for_selectors(
        &self,
        page: PageId,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<(), PageError> {
        self.state().calls.push(PageCall::WaitForSelectors {
            page,
            selectors: selectors.to_vec(),
        });
        if self.script(page)?.ready {
            Ok(())
        } else {
            Err(PageError::SelectorTimeout { timeout })
        }
    }

    async fn extract(&self, page: PageId, _locators: &Locators) -> Result<Vec<RawItem>, PageError> {
        self.state().calls.push(PageCall::Extract { page });
        Ok(self.script(page)?.items)
    }

    async fn screenshot(&self, page: PageId, base: &Path) -> Result<PathBuf, PageError> {
        let path = base.with_extension("png");
        self.state().calls.push(PageCall::Screenshot {
            page,
            path: path.clone(),
        });
        match self.script(page)?.capture_error {
            Some(reason) => Err(PageError::Backend(reason)),
            None => Ok(path),
        }
    }

    async fn close(&self, page: PageId) -> Result<(), PageError> {
        let mut state = self.state();
        state.calls.push(PageCall::Close { page });
        match state.open.remove(&page) {
            Some(_) => Ok(()),
            None => Err(PageError::UnknownPage(page)),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
