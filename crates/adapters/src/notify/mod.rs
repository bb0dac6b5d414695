// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert delivery adapters

mod noop;
mod sendmail;
mod webhook;

pub use noop::NoOpNotifier;
pub use sendmail::SendmailNotifier;
pub use webhook::{WebhookNotifier, WebhookPayload};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;

use async_trait::async_trait;
use sw_core::{Alert, NotifyConfig, Transport};
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("sendmail exited with {status}: {stderr}")]
    Sendmail { status: String, stderr: String },
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook returned HTTP {0}")]
    Status(u16),
    #[error("notifier misconfigured: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for sending alerts
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Deliver one alert. Callers log failures and do not retry.
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// The notifier selected by `[notify] transport`
#[derive(Clone)]
pub enum TransportNotifier {
    None(NoOpNotifier),
    Sendmail(SendmailNotifier),
    Webhook(WebhookNotifier),
}

impl TransportNotifier {
    pub fn from_config(config: &NotifyConfig) -> Result<Self, NotifyError> {
        match config.transport {
            Transport::None => Ok(Self::None(NoOpNotifier::new())),
            Transport::Sendmail => Ok(Self::Sendmail(SendmailNotifier::new(
                config.sendmail_path.clone(),
                config.sender.clone(),
            ))),
            Transport::Webhook => {
                let url = config
                    .webhook_url
                    .clone()
                    .ok_or_else(|| NotifyError::Config("webhook_url is not set".to_string()))?;
                Ok(Self::Webhook(WebhookNotifier::new(url)?))
            }
        }
    }

    pub fn transport(&self) -> Transport {
        match self {
            Self::None(_) => Transport::None,
            Self::Sendmail(_) => Transport::Sendmail,
            Self::Webhook(_) => Transport::Webhook,
        }
    }
}

#[async_trait]
impl Notifier for TransportNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        match self {
            Self::None(n) => n.notify(alert).await,
            Self::Sendmail(n) => n.notify(alert).await,
            Self::Webhook(n) => n.notify(alert).await,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
