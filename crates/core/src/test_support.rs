// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for tests in this and downstream crates
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::config::{Config, TargetConfig};

/// One target, "Acme", expecting a single product under 500
pub const ACME_CONFIG: &str = r#"
[global]
default_refresh_seconds = 60
error_retry_seconds = 30
success_retry_seconds = 300
max_tabs = 10

[[target]]
store = "Acme"
url = "https://acme.example/gpu"
expected_product_count = 1
max_price = 500.0

[target.locators]
container = ".product"
name = ".title"
url = "a.buy"
out_of_stock = ".stock"
price = ".price"
"#;

/// Parse a config that is known to be valid
pub fn config(toml: &str) -> Config {
    match Config::parse(toml) {
        Ok(config) => config,
        Err(e) => unreachable!("fixture config must parse: {}", e),
    }
}

pub fn acme_config() -> Config {
    config(ACME_CONFIG)
}

pub fn acme_target() -> TargetConfig {
    let mut config = acme_config();
    config.targets.remove(0)
}

/// Config with `count` targets named `store-0..store-n` sharing one layout
pub fn many_targets(count: usize, max_tabs: usize) -> Config {
    let mut toml = format!(
        "[global]\nmax_tabs = {}\nstagger = \"0s\"\nerror_retry_seconds = 30\n",
        max_tabs
    );
    for i in 0..count {
        toml.push_str(&format!(
            r#"
[[target]]
store = "store-{i}"
url = "https://store-{i}.example/"

[target.locators]
container = ".product"
name = ".title"
url = "a.buy"
out_of_stock = ".stock"
price = ".price"
"#
        ));
    }
    config(&toml)
}
