// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Email alerts through the local sendmail binary

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use sw_core::Alert;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Pipes a plain-text message to `sendmail -t`
#[derive(Clone, Debug)]
pub struct SendmailNotifier {
    program: PathBuf,
    sender: String,
}

impl SendmailNotifier {
    pub fn new(program: impl Into<PathBuf>, sender: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            sender: sender.into(),
        }
    }

    /// Headers plus the URL-per-line body
    pub fn render(&self, alert: &Alert) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\nContent-Type: text/plain; charset=utf-8\n\n{}",
            self.sender,
            alert.recipients.join(", "),
            alert.subject(),
            alert.body()
        )
    }
}

#[async_trait]
impl Notifier for SendmailNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        if alert.recipients.is_empty() {
            tracing::warn!(store = %alert.store, "no recipients, alert dropped");
            return Ok(());
        }

        let mut child = Command::new(&self.program)
            .arg("-t")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(self.render(alert).as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(NotifyError::Sendmail {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sendmail_tests.rs"]
mod tests;
