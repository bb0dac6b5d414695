// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sw_core::test_support::config;

const TARGET: &str = r#"
[[target]]
store = "Acme"
url = "https://acme.example"

[target.locators]
container = ".p"
name = ".n"
url = "a"
out_of_stock = ".s"
price = ".pr"
"#;

#[test]
fn default_transport_is_noop() {
    let notifier = TransportNotifier::from_config(&config(TARGET).notify).unwrap();
    assert_eq!(notifier.transport(), Transport::None);
}

#[test]
fn sendmail_transport_is_selected() {
    let toml = format!(
        "[notify]\ntransport = \"sendmail\"\nrecipients = [\"me@example.com\"]\n{}",
        TARGET
    );
    let notifier = TransportNotifier::from_config(&config(&toml).notify).unwrap();
    assert_eq!(notifier.transport(), Transport::Sendmail);
}

#[test]
fn webhook_transport_is_selected() {
    let toml = format!(
        "[notify]\ntransport = \"webhook\"\nwebhook_url = \"https://hooks.example/x\"\n{}",
        TARGET
    );
    let notifier = TransportNotifier::from_config(&config(&toml).notify).unwrap();
    assert_eq!(notifier.transport(), Transport::Webhook);
}

#[test]
fn webhook_without_url_is_rejected() {
    let notify = NotifyConfig {
        transport: Transport::Webhook,
        ..NotifyConfig::default()
    };
    assert!(matches!(
        TransportNotifier::from_config(&notify),
        Err(NotifyError::Config(_))
    ));
}

#[tokio::test]
async fn noop_transport_accepts_alerts() {
    let notifier = TransportNotifier::None(NoOpNotifier::new());
    let alert = Alert::new("Acme", Vec::new(), Vec::new());

    notifier.notify(&alert).await.unwrap();
}
