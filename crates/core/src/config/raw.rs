// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk config shape and its validation into [`Config`]

use super::{
    Config, ConfigError, GlobalConfig, Locators, NotifyConfig, OutOfStockMatcher, TargetConfig,
    Transport,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawConfig {
    #[serde(default)]
    global: RawGlobal,
    #[serde(default)]
    notify: RawNotify,
    #[serde(default, rename = "target")]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct RawGlobal {
    headless: bool,
    verbose: bool,
    default_refresh_seconds: u64,
    default_max_price: f64,
    error_retry_seconds: u64,
    success_retry_seconds: u64,
    max_tabs: usize,
    disabled: Vec<String>,
    #[serde(with = "humantime_serde")]
    stagger: Duration,
    #[serde(with = "humantime_serde")]
    navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    selector_timeout: Duration,
    screenshot_dir: PathBuf,
    log_file: PathBuf,
    user_agent: String,
}

impl Default for RawGlobal {
    fn default() -> Self {
        Self {
            headless: true,
            verbose: false,
            default_refresh_seconds: 60,
            default_max_price: f64::INFINITY,
            error_retry_seconds: 30,
            success_retry_seconds: 300,
            max_tabs: 10,
            disabled: Vec::new(),
            stagger: Duration::from_secs(5),
            navigation_timeout: Duration::from_secs(5),
            selector_timeout: Duration::from_secs(30),
            screenshot_dir: PathBuf::from("screenshots"),
            log_file: PathBuf::from("logs/stockwatch.log"),
            user_agent: concat!("stockwatch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RawGlobal {
    pub(super) fn into_global(self) -> GlobalConfig {
        GlobalConfig {
            headless: self.headless,
            verbose: self.verbose,
            default_refresh: Duration::from_secs(self.default_refresh_seconds),
            default_max_price: self.default_max_price,
            error_retry: Duration::from_secs(self.error_retry_seconds),
            success_retry: Duration::from_secs(self.success_retry_seconds),
            max_tabs: self.max_tabs,
            disabled: self.disabled,
            stagger: self.stagger,
            navigation_timeout: self.navigation_timeout,
            selector_timeout: self.selector_timeout,
            screenshot_dir: self.screenshot_dir,
            log_file: self.log_file,
            user_agent: self.user_agent,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tabs == 0 {
            return Err(invalid("global.max_tabs must be at least 1"));
        }
        for (field, secs) in [
            ("default_refresh_seconds", self.default_refresh_seconds),
            ("error_retry_seconds", self.error_retry_seconds),
            ("success_retry_seconds", self.success_retry_seconds),
        ] {
            if secs == 0 {
                return Err(invalid(format!("global.{} must be positive", field)));
            }
        }
        if self.default_max_price.is_nan() || self.default_max_price <= 0.0 {
            return Err(invalid("global.default_max_price must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct RawNotify {
    transport: Transport,
    recipients: Vec<String>,
    sender: String,
    sendmail_path: PathBuf,
    webhook_url: Option<String>,
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            transport: Transport::None,
            recipients: Vec::new(),
            sender: "stockwatch@localhost".to_string(),
            sendmail_path: PathBuf::from("/usr/sbin/sendmail"),
            webhook_url: None,
        }
    }
}

impl RawNotify {
    pub(super) fn into_notify(self) -> NotifyConfig {
        NotifyConfig {
            transport: self.transport,
            recipients: self.recipients,
            sender: self.sender,
            sendmail_path: self.sendmail_path,
            webhook_url: self.webhook_url,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // These end up in mail headers.
        if has_control(&self.sender) {
            return Err(invalid("notify.sender must not contain control characters"));
        }
        if let Some(recipient) = self.recipients.iter().find(|r| has_control(r)) {
            return Err(invalid(format!(
                "notify.recipients: {:?} contains control characters",
                recipient
            )));
        }

        match self.transport {
            Transport::Webhook if self.webhook_url.as_deref().map_or(true, str::is_empty) => {
                Err(invalid("notify.webhook_url is required for the webhook transport"))
            }
            Transport::Sendmail if self.recipients.is_empty() => Err(invalid(
                "notify.recipients must list at least one address for the sendmail transport",
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    store: String,
    url: String,
    #[serde(default = "default_expected_product_count")]
    expected_product_count: usize,
    max_price: Option<f64>,
    out_of_stock_pattern: Option<String>,
    refresh_seconds: Option<u64>,
    max_tabs: Option<usize>,
    locators: Locators,
}

fn default_expected_product_count() -> usize {
    1
}

impl RawTarget {
    fn into_target(self) -> Result<TargetConfig, ConfigError> {
        let ctx = format!("target '{}'", self.store);
        if self.store.trim().is_empty() {
            return Err(invalid("target.store must not be empty"));
        }
        if has_control(&self.store) {
            return Err(invalid(format!(
                "target store {:?} contains control characters",
                self.store
            )));
        }
        if self.url.trim().is_empty() {
            return Err(invalid(format!("{}: url must not be empty", ctx)));
        }
        if self.expected_product_count == 0 {
            return Err(invalid(format!(
                "{}: expected_product_count must be at least 1",
                ctx
            )));
        }
        if self.max_tabs == Some(0) {
            return Err(invalid(format!("{}: max_tabs must be at least 1", ctx)));
        }
        if self.refresh_seconds == Some(0) {
            return Err(invalid(format!("{}: refresh_seconds must be positive", ctx)));
        }
        if let Some(price) = self.max_price {
            if price.is_nan() || price <= 0.0 {
                return Err(invalid(format!("{}: max_price must be positive", ctx)));
            }
        }
        for (role, selector) in self.locators.roles() {
            if selector.trim().is_empty() {
                return Err(invalid(format!(
                    "{}: locators.{} must not be empty",
                    ctx, role
                )));
            }
        }

        let out_of_stock = self
            .out_of_stock_pattern
            .as_deref()
            .map(OutOfStockMatcher::new)
            .transpose()
            .map_err(|e| invalid(format!("{}: out_of_stock_pattern: {}", ctx, e)))?;

        Ok(TargetConfig {
            store: self.store,
            url: self.url,
            expected_product_count: self.expected_product_count,
            max_price: self.max_price,
            out_of_stock,
            refresh: self.refresh_seconds.map(Duration::from_secs),
            max_tabs: self.max_tabs,
            locators: self.locators,
        })
    }
}

impl RawConfig {
    pub(super) fn into_config(self) -> Result<Config, ConfigError> {
        self.global.validate()?;
        self.notify.validate()?;

        if self.targets.is_empty() {
            return Err(invalid("at least one [[target]] is required"));
        }

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(self.targets.len());
        for raw in self.targets {
            if !seen.insert(raw.store.to_lowercase()) {
                return Err(invalid(format!("duplicate target store '{}'", raw.store)));
            }
            targets.push(raw.into_target()?);
        }

        for name in &self.global.disabled {
            if !seen.contains(&name.to_lowercase()) {
                tracing::warn!(store = %name, "disabled store matches no target");
            }
        }

        Ok(Config {
            global: self.global.into_global(),
            notify: self.notify.into_notify(),
            targets,
        })
    }
}

fn has_control(value: &str) -> bool {
    value.chars().any(char::is_control)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
