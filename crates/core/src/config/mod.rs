// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch configuration
//!
//! Loaded once at startup from TOML and shared read-only (behind an `Arc`)
//! by every scheduler and the tab pool. Nothing here is mutated after
//! [`Config::load`] returns.

mod raw;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub notify: NotifyConfig,
    /// Targets in file order; the order drives the startup stagger
    pub targets: Vec<TargetConfig>,
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate config from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: raw::RawConfig = toml::from_str(content)?;
        raw.into_config()
    }

    pub fn is_disabled(&self, store: &str) -> bool {
        self.global.is_disabled(store)
    }

    /// Targets that should be activated, paired with their position in the file
    pub fn enabled_targets(&self) -> impl Iterator<Item = (usize, &TargetConfig)> {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, t)| !self.is_disabled(&t.store))
    }
}

/// Process-wide defaults
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    /// Accepted for compatibility; the HTTP loader never opens a window
    pub headless: bool,
    /// Mirror the log to the console
    pub verbose: bool,
    pub default_refresh: Duration,
    pub default_max_price: f64,
    pub error_retry: Duration,
    pub success_retry: Duration,
    /// Global ceiling on concurrently open pages
    pub max_tabs: usize,
    /// Store names that are never activated
    pub disabled: Vec<String>,
    /// Delay between activating consecutive targets
    pub stagger: Duration,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    pub screenshot_dir: PathBuf,
    pub log_file: PathBuf,
    pub user_agent: String,
}

impl GlobalConfig {
    pub fn is_disabled(&self, store: &str) -> bool {
        self.disabled.iter().any(|d| d.eq_ignore_ascii_case(store))
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        raw::RawGlobal::default().into_global()
    }
}

/// One watched page
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub store: String,
    pub url: String,
    pub expected_product_count: usize,
    pub max_price: Option<f64>,
    pub out_of_stock: Option<OutOfStockMatcher>,
    pub refresh: Option<Duration>,
    /// Per-target concurrency hint; the global ceiling is authoritative
    pub max_tabs: Option<usize>,
    pub locators: Locators,
}

impl TargetConfig {
    /// Prices must be strictly below this to qualify
    pub fn price_ceiling(&self, global: &GlobalConfig) -> f64 {
        self.max_price.unwrap_or(global.default_max_price)
    }

    /// Delay after a check that found nothing in stock
    pub fn refresh_interval(&self, global: &GlobalConfig) -> Duration {
        self.refresh.unwrap_or(global.default_refresh)
    }
}

/// Case-insensitive pattern matched against the out-of-stock indicator text
#[derive(Debug, Clone)]
pub struct OutOfStockMatcher(Regex);

impl OutOfStockMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// The role a locator plays on a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorRole {
    /// One element per product
    Container,
    Name,
    Url,
    OutOfStock,
    Price,
}

impl LocatorRole {
    /// Roles resolved inside each container
    pub const FIELDS: [LocatorRole; 4] = [
        LocatorRole::Name,
        LocatorRole::Url,
        LocatorRole::OutOfStock,
        LocatorRole::Price,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LocatorRole::Container => "container",
            LocatorRole::Name => "name",
            LocatorRole::Url => "url",
            LocatorRole::OutOfStock => "out_of_stock",
            LocatorRole::Price => "price",
        }
    }
}

impl fmt::Display for LocatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural selectors for the parts of a product listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Locators {
    pub container: String,
    pub name: String,
    pub url: String,
    pub out_of_stock: String,
    pub price: String,
}

impl Locators {
    pub fn get(&self, role: LocatorRole) -> &str {
        match role {
            LocatorRole::Container => &self.container,
            LocatorRole::Name => &self.name,
            LocatorRole::Url => &self.url,
            LocatorRole::OutOfStock => &self.out_of_stock,
            LocatorRole::Price => &self.price,
        }
    }

    /// Every locator paired with its role, container first
    pub fn roles(&self) -> impl Iterator<Item = (LocatorRole, &str)> {
        std::iter::once(LocatorRole::Container)
            .chain(LocatorRole::FIELDS)
            .map(move |role| (role, self.get(role)))
    }

    /// The container plus each field locator scoped under it.
    ///
    /// The page counts as ready once anything in this union matches.
    pub fn ready_selectors(&self) -> Vec<String> {
        self.roles()
            .map(|(role, selector)| match role {
                LocatorRole::Container => selector.to_string(),
                _ => format!("{} {}", self.container, selector),
            })
            .collect()
    }
}

/// How alerts are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    None,
    Sendmail,
    Webhook,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::None => f.write_str("none"),
            Transport::Sendmail => f.write_str("sendmail"),
            Transport::Webhook => f.write_str("webhook"),
        }
    }
}

/// Alert delivery settings
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub transport: Transport,
    pub recipients: Vec<String>,
    pub sender: String,
    pub sendmail_path: PathBuf,
    pub webhook_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        raw::RawNotify::default().into_notify()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
