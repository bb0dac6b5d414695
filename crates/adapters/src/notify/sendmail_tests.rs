// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sw_core::ProductRecord;

fn alert(recipients: &[&str]) -> Alert {
    Alert::new(
        "Acme",
        recipients.iter().map(|r| r.to_string()).collect(),
        vec![
            ProductRecord {
                url: Some("https://acme.example/gpu".to_string()),
                ..ProductRecord::default()
            },
            ProductRecord {
                url: Some("https://acme.example/cpu".to_string()),
                ..ProductRecord::default()
            },
        ],
    )
}

#[test]
fn render_has_headers_and_one_url_per_line() {
    let notifier = SendmailNotifier::new("/usr/sbin/sendmail", "watch@example.com");

    let message = notifier.render(&alert(&["a@example.com", "b@example.com"]));

    assert_eq!(
        message,
        "From: watch@example.com\n\
         To: a@example.com, b@example.com\n\
         Subject: In stock at Acme\n\
         Content-Type: text/plain; charset=utf-8\n\
         \n\
         https://acme.example/gpu\n\
         https://acme.example/cpu\n"
    );
}

#[tokio::test]
async fn no_recipients_skips_delivery() {
    let notifier = SendmailNotifier::new("/nonexistent/sendmail", "watch@example.com");

    notifier.notify(&alert(&[])).await.unwrap();
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let notifier = SendmailNotifier::new("/nonexistent/sendmail", "watch@example.com");

    let err = notifier.notify(&alert(&["a@example.com"])).await.unwrap_err();

    assert!(matches!(err, NotifyError::Spawn { .. }));
    assert!(err.to_string().contains("/nonexistent/sendmail"));
}

#[cfg(unix)]
#[tokio::test]
async fn message_is_piped_to_the_program() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let captured = dir.path().join("message.txt");
    let script = dir.path().join("sendmail");
    std::fs::write(
        &script,
        format!("#!/bin/sh\ncat > '{}'\n", captured.display()),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let notifier = SendmailNotifier::new(&script, "watch@example.com");
    notifier.notify(&alert(&["a@example.com"])).await.unwrap();

    let written = std::fs::read_to_string(&captured).unwrap();
    assert!(written.contains("Subject: In stock at Acme"));
    assert!(written.ends_with("https://acme.example/cpu\n"));
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("sendmail");
    std::fs::write(&script, "#!/bin/sh\ncat > /dev/null\necho 'relay denied' >&2\nexit 75\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let notifier = SendmailNotifier::new(&script, "watch@example.com");
    let err = notifier.notify(&alert(&["a@example.com"])).await.unwrap_err();

    assert!(matches!(
        err,
        NotifyError::Sendmail { ref stderr, .. } if stderr == "relay denied"
    ));
}
