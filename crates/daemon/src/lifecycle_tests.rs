// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const CONFIG: &str = r#"
[global]
default_refresh_seconds = 60
default_max_price = 1000.0
max_tabs = 4
disabled = ["Slowstore"]

[[target]]
store = "Acme"
url = "https://acme.example/gpu"
max_price = 500.0
refresh_seconds = 90

[target.locators]
container = ".product"
name = ".title"
url = "a.buy"
out_of_stock = ".stock"
price = ".price"

[[target]]
store = "Slowstore"
url = "https://slow.example/"

[target.locators]
container = ".product"
name = ".title"
url = "a.buy"
out_of_stock = ".stock"
price = ".price"
"#;

#[test]
fn summary_lists_each_target_with_effective_settings() {
    let config = Config::parse(CONFIG).unwrap();

    let summary = summary(&config);
    let lines: Vec<&str> = summary.lines().collect();

    assert_eq!(
        lines[0],
        "2 target(s), 1 enabled; max_tabs 4; transport none"
    );
    assert!(lines[1].contains("Acme"));
    assert!(lines[1].contains("enabled"));
    assert!(lines[1].contains("ceiling 500.00"));
    assert!(lines[1].contains("refresh 90s"));
    assert!(lines[2].contains("Slowstore"));
    assert!(lines[2].contains("disabled"));
    assert!(lines[2].contains("ceiling 1000.00"));
    assert!(lines[2].contains("refresh 60s"));
}

#[test]
fn startup_marker_is_appended_with_pid() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("stockwatch.log");

    write_startup_marker(&log).unwrap();
    write_startup_marker(&log).unwrap();

    let content = std::fs::read_to_string(&log).unwrap();
    let expected = format!("{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id());
    assert_eq!(content.lines().filter(|l| *l == expected).count(), 2);
}

#[test]
fn startup_error_lands_in_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("stockwatch.log");

    write_startup_error(&log, &LifecycleError::BadLogPath(PathBuf::from("/")));

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.starts_with("ERROR failed to start: log file has no usable directory"));
}

#[tokio::test]
async fn startup_builds_supervisor_for_configured_transport() {
    let config = Config::parse(CONFIG).unwrap();

    let supervisor = startup(config).unwrap();

    assert_eq!(supervisor.pool_stats().capacity, 4);
    assert_eq!(supervisor.pool_stats().in_use, 0);
}
