// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert message sent when a check finds qualifying items

use crate::product::ProductRecord;
use serde::Serialize;

/// One message per successful check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub store: String,
    pub recipients: Vec<String>,
    pub items: Vec<ProductRecord>,
}

impl Alert {
    pub fn new(store: impl Into<String>, recipients: Vec<String>, items: Vec<ProductRecord>) -> Self {
        Self {
            store: store.into(),
            recipients,
            items,
        }
    }

    pub fn subject(&self) -> String {
        format!("In stock at {}", self.store)
    }

    /// Item URLs, one per line
    pub fn body(&self) -> String {
        let mut body = String::new();
        for url in self.urls() {
            body.push_str(url);
            body.push('\n');
        }
        body
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| item.url.as_deref())
    }

    /// Single-line summary used by log output and chat-style transports
    pub fn summary(&self) -> String {
        let lines: Vec<String> = self
            .items
            .iter()
            .map(|item| {
                let name = item.name.as_deref().unwrap_or("(unnamed)");
                let url = item.url.as_deref().unwrap_or("");
                match item.price {
                    Some(price) => format!("{} ({:.2}) {}", name, price, url),
                    None => format!("{} {}", name, url),
                }
            })
            .collect();
        lines.join("; ")
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
