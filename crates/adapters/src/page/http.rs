// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP page loader
//!
//! Fetches the page with reqwest and inspects the returned document with
//! scraper. A "page" is the last document fetched for a URL. While waiting for
//! selectors the document is refetched periodically, so content that shows up
//! later is still picked up. Captures are the raw HTML.

use super::{PageError, PageLoader};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use sw_core::{LocatorRole, Locators, PageId, RawItem};
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct Document {
    url: Option<Url>,
    html: Option<String>,
}

/// reqwest + scraper backed loader
#[derive(Clone)]
pub struct HttpPageLoader {
    client: reqwest::Client,
    pages: Arc<Mutex<HashMap<PageId, Document>>>,
    next_id: Arc<AtomicU64>,
    poll_interval: Duration,
}

impl HttpPageLoader {
    pub fn new(user_agent: &str) -> Result<Self, PageError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| PageError::Backend(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            pages: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// How often the document is refetched while waiting for selectors
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Number of pages currently open
    pub fn open_pages(&self) -> usize {
        self.pages().len()
    }

    fn pages(&self) -> MutexGuard<'_, HashMap<PageId, Document>> {
        self.pages.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy out what is known about a page, so no lock is held while parsing
    fn snapshot(&self, page: PageId) -> Result<(Option<Url>, Option<String>), PageError> {
        let pages = self.pages();
        let doc = pages.get(&page).ok_or(PageError::UnknownPage(page))?;
        Ok((doc.url.clone(), doc.html.clone()))
    }

    fn store(&self, page: PageId, html: String) -> Result<(), PageError> {
        let mut pages = self.pages();
        let doc = pages.get_mut(&page).ok_or(PageError::UnknownPage(page))?;
        doc.html = Some(html);
        Ok(())
    }

    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<String, String> {
        let request = async {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?;
            response.text().await
        };
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {:?}", timeout)),
        }
    }
}

#[async_trait]
impl PageLoader for HttpPageLoader {
    async fn open(&self) -> Result<PageId, PageError> {
        let page = PageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pages().insert(page, Document::default());
        Ok(page)
    }

    async fn navigate(&self, page: PageId, url: &str, timeout: Duration) -> Result<(), PageError> {
        let parsed = Url::parse(url).map_err(|e| PageError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Remember the URL even if this fetch fails; the selector wait retries it.
        {
            let mut pages = self.pages();
            let doc = pages.get_mut(&page).ok_or(PageError::UnknownPage(page))?;
            doc.url = Some(parsed.clone());
            doc.html = None;
        }

        match self.fetch(&parsed, timeout).await {
            Ok(html) => self.store(page, html),
            Err(reason) => Err(PageError::Navigation {
                url: url.to_string(),
                reason,
            }),
        }
    }

    async fn wait_for_selectors(
        &self,
        page: PageId,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<(), PageError> {
        for selector in selectors {
            parse_selector("ready", selector)?;
        }

        let deadline = Instant::now() + timeout;
        loop {
            let (url, html) = self.snapshot(page)?;
            if let Some(html) = html.as_deref() {
                if matches_any(html, selectors)? {
                    return Ok(());
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(PageError::SelectorTimeout { timeout });
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;

            let remaining = deadline.saturating_duration_since(Instant::now());
            if let (Some(url), false) = (url, remaining.is_zero()) {
                match self.fetch(&url, remaining).await {
                    Ok(html) => self.store(page, html)?,
                    Err(reason) => tracing::debug!(%url, %reason, "refetch failed"),
                }
            }
        }
    }

    async fn extract(&self, page: PageId, locators: &Locators) -> Result<Vec<RawItem>, PageError> {
        let (url, html) = self.snapshot(page)?;
        let html = html.ok_or_else(|| PageError::Extract(format!("{} has no content", page)))?;
        extract_items(&html, url.as_ref(), locators)
    }

    async fn screenshot(&self, page: PageId, base: &Path) -> Result<PathBuf, PageError> {
        let (url, html) = self.snapshot(page)?;
        let path = base.with_extension("html");
        let content = html.unwrap_or_else(|| {
            let url = url.map(|u| u.to_string()).unwrap_or_default();
            format!("<!-- nothing was fetched from {} -->\n", url)
        });

        let io_err = |source: std::io::Error| PageError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, content).await.map_err(io_err)?;
        Ok(path)
    }

    async fn close(&self, page: PageId) -> Result<(), PageError> {
        match self.pages().remove(&page) {
            Some(_) => Ok(()),
            None => Err(PageError::UnknownPage(page)),
        }
    }
}

fn parse_selector(role: &str, selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|_| PageError::InvalidSelector {
        role: role.to_string(),
        selector: selector.to_string(),
    })
}

/// True when any selector matches somewhere in the document
fn matches_any(html: &str, selectors: &[String]) -> Result<bool, PageError> {
    let document = Html::parse_document(html);
    for selector in selectors {
        let selector = parse_selector("ready", selector)?;
        if document.select(&selector).next().is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// One item per container, with each field taken from the first match inside it
fn extract_items(
    html: &str,
    base: Option<&Url>,
    locators: &Locators,
) -> Result<Vec<RawItem>, PageError> {
    let selector = |role: LocatorRole| parse_selector(role.name(), locators.get(role));
    let container = selector(LocatorRole::Container)?;
    let name = selector(LocatorRole::Name)?;
    let link = selector(LocatorRole::Url)?;
    let out_of_stock = selector(LocatorRole::OutOfStock)?;
    let price = selector(LocatorRole::Price)?;

    let document = Html::parse_document(html);
    let items = document
        .select(&container)
        .map(|element| RawItem {
            name: first_text(element, &name),
            url: element
                .select(&link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| absolute_url(base, href)),
            out_of_stock: first_text(element, &out_of_stock),
            price: first_text(element, &price),
        })
        .collect();
    Ok(items)
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|found| {
        found
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn absolute_url(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
