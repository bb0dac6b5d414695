// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON webhook alerts

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use sw_core::{Alert, ProductRecord};

/// Body POSTed to the webhook.
///
/// `content` is a one-line summary so chat-style hooks render something
/// readable; the structured fields carry the rest.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub content: String,
    pub store: &'a str,
    pub subject: String,
    pub items: &'a [ProductRecord],
}

impl<'a> WebhookPayload<'a> {
    pub fn from_alert(alert: &'a Alert) -> Self {
        Self {
            content: format!("{}: {}", alert.subject(), alert.summary()),
            store: &alert.store,
            subject: alert.subject(),
            items: &alert.items,
        }
    }
}

/// POSTs each alert as JSON
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::from_alert(alert))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
