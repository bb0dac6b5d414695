// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sw_core::ProductRecord;

fn alert(store: &str) -> Alert {
    Alert::new(
        store,
        vec!["me@example.com".to_string()],
        vec![ProductRecord {
            url: Some("https://acme.example/gpu".to_string()),
            ..ProductRecord::default()
        }],
    )
}

#[tokio::test]
async fn fake_notifier_records_alerts() {
    let notifier = FakeNotifier::new();

    notifier.notify(&alert("Acme")).await.unwrap();
    notifier.notify(&alert("Beta")).await.unwrap();

    let alerts = notifier.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].store, "Acme");
    assert_eq!(alerts[1].store, "Beta");
}

#[tokio::test]
async fn failing_fake_still_records() {
    let notifier = FakeNotifier::new();
    notifier.set_failing(true);

    assert!(notifier.notify(&alert("Acme")).await.is_err());
    assert_eq!(notifier.alerts().len(), 1);
}
