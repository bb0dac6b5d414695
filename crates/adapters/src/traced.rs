// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::notify::{Notifier, NotifyError};
use crate::page::{PageError, PageLoader};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sw_core::{Alert, Locators, PageId, RawItem};
use tracing::Instrument;

/// Wrapper that adds tracing to any PageLoader
#[derive(Clone)]
pub struct TracedPageLoader<L> {
    inner: L,
}

impl<L> TracedPageLoader<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: PageLoader> PageLoader for TracedPageLoader<L> {
    async fn open(&self) -> Result<PageId, PageError> {
        let result = self.inner.open().await;
        match &result {
            Ok(page) => tracing::debug!(%page, "page opened"),
            Err(e) => tracing::error!(error = %e, "open failed"),
        }
        result
    }

    async fn navigate(&self, page: PageId, url: &str, timeout: Duration) -> Result<(), PageError> {
        let span = tracing::info_span!("page.navigate", %page, url);
        async {
            tracing::info!(timeout_ms = timeout.as_millis() as u64, "starting");

            // Precondition: only web URLs can be loaded
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                tracing::error!("not an http(s) url");
                return Err(PageError::Navigation {
                    url: url.to_string(),
                    reason: "not an http(s) url".to_string(),
                });
            }

            let start = Instant::now();
            let result = self.inner.navigate(page, url, timeout).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "navigated"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "navigation failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn wait_for_selectors(
        &self,
        page: PageId,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<(), PageError> {
        let span = tracing::info_span!("page.wait", %page, selectors = selectors.len());
        async {
            let start = Instant::now();
            let result = self.inner.wait_for_selectors(page, selectors, timeout).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "page ready"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "page never became ready"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn extract(&self, page: PageId, locators: &Locators) -> Result<Vec<RawItem>, PageError> {
        let span = tracing::info_span!("page.extract", %page, container = %locators.container);
        async {
            let result = self.inner.extract(page, locators).await;
            match &result {
                Ok(items) => tracing::debug!(count = items.len(), "extracted"),
                Err(e) => tracing::error!(error = %e, "extract failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn screenshot(&self, page: PageId, base: &Path) -> Result<PathBuf, PageError> {
        let result = self.inner.screenshot(page, base).await;
        match &result {
            Ok(path) => tracing::info!(%page, path = %path.display(), "capture saved"),
            Err(e) => tracing::warn!(%page, error = %e, "capture failed"),
        }
        result
    }

    async fn close(&self, page: PageId) -> Result<(), PageError> {
        let result = self.inner.close(page).await;
        // close() failing is often acceptable (page already gone)
        match &result {
            Ok(()) => tracing::debug!(%page, "page closed"),
            Err(e) => tracing::warn!(%page, error = %e, "close failed (may be expected)"),
        }
        result
    }
}

/// Wrapper that adds tracing to any Notifier
#[derive(Clone)]
pub struct TracedNotifier<N> {
    inner: N,
}

impl<N> TracedNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

#[async_trait]
impl<N: Notifier> Notifier for TracedNotifier<N> {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify", store = %alert.store, items = alert.items.len());
        async {
            tracing::info!(recipients = alert.recipients.len(), "sending alert");

            let start = Instant::now();
            let result = self.inner.notify(alert).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "alert sent"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "alert failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
