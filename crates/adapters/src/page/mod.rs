// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page loading adapters

mod http;

pub use http::HttpPageLoader;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePage, FakePageLoader, PageCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sw_core::{Locators, PageId, RawItem};
use thiserror::Error;

/// Errors from page operations
#[derive(Debug, Error)]
pub enum PageError {
    /// Navigation did not complete in time or the server refused it
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("no ready selector matched within {timeout:?}")]
    SelectorTimeout { timeout: Duration },
    #[error("invalid {role} selector '{selector}'")]
    InvalidSelector { role: String, selector: String },
    #[error("extraction failed: {0}")]
    Extract(String),
    #[error("could not open page: {0}")]
    Open(String),
    #[error("{0} is not open")]
    UnknownPage(PageId),
    /// The loader itself could not be constructed
    #[error("page loader backend: {0}")]
    Backend(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for loading and inspecting product pages
#[async_trait]
pub trait PageLoader: Clone + Send + Sync + 'static {
    /// Open a fresh page context
    async fn open(&self) -> Result<PageId, PageError>;

    /// Point the page at `url`, giving up after `timeout`
    async fn navigate(&self, page: PageId, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// Wait until any of `selectors` matches something on the page
    async fn wait_for_selectors(
        &self,
        page: PageId,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<(), PageError>;

    /// One raw item per container element
    async fn extract(&self, page: PageId, locators: &Locators) -> Result<Vec<RawItem>, PageError>;

    /// Capture the page to `base` plus an extension chosen by the loader.
    ///
    /// Returns the path actually written.
    async fn screenshot(&self, page: PageId, base: &Path) -> Result<PathBuf, PageError>;

    /// Close the page context
    async fn close(&self, page: PageId) -> Result<(), PageError>;
}
