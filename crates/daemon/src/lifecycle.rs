// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process lifecycle: log setup, adapter construction, config summaries.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sw_adapters::{
    HttpPageLoader, NotifyError, PageError, TracedNotifier, TracedPageLoader, TransportNotifier,
};
use sw_core::{Config, SystemClock};
use sw_engine::{RuntimeError, Supervisor};
use thiserror::Error;
use tracing::info;

/// Supervisor with the concrete adapters (wrapped with tracing)
pub type DaemonSupervisor =
    Supervisor<TracedPageLoader<HttpPageLoader>, TracedNotifier<TransportNotifier>, SystemClock>;

/// Startup marker prefix written to the log before anything else.
/// Full format: "--- stockwatch: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- stockwatch: starting (pid: ";

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("log file has no usable directory: {0}")]
    BadLogPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page loader: {0}")]
    Page(#[from] PageError),

    #[error("notifier: {0}")]
    Notify(#[from] NotifyError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Append the startup marker to the log file, creating its directory
pub fn write_startup_marker(log_path: &Path) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

/// Write a startup error straight to the log file.
/// The non-blocking writer may not flush before the process exits.
pub fn write_startup_error(log_path: &Path, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR failed to start: {}", error);
}

/// Install the global subscriber: always the log file, stderr when verbose
pub fn setup_logging(
    log_path: &Path,
    verbose: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let bad_path = || LifecycleError::BadLogPath(log_path.to_path_buf());
    let dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => return Err(bad_path()),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = log_path.file_name().ok_or_else(bad_path)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(console)
        .init();

    Ok(guard)
}

/// Build the production adapters and the supervisor that drives them
pub fn startup(config: Config) -> Result<DaemonSupervisor, LifecycleError> {
    let loader = TracedPageLoader::new(HttpPageLoader::new(&config.global.user_agent)?);
    let notifier = TracedNotifier::new(TransportNotifier::from_config(&config.notify)?);

    let enabled = config.enabled_targets().count();
    info!(
        targets = config.targets.len(),
        enabled,
        max_tabs = config.global.max_tabs,
        transport = %config.notify.transport,
        screenshot_dir = %config.global.screenshot_dir.display(),
        "starting stockwatch"
    );

    Ok(Supervisor::new(config, loader, notifier, SystemClock))
}

/// Human-readable summary printed by `check`
pub fn summary(config: &Config) -> String {
    let global = &config.global;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} target(s), {} enabled; max_tabs {}; transport {}",
        config.targets.len(),
        config.enabled_targets().count(),
        global.max_tabs,
        config.notify.transport
    );
    for target in &config.targets {
        let state = if config.is_disabled(&target.store) {
            "disabled"
        } else {
            "enabled"
        };
        let _ = writeln!(
            out,
            "  {:<20} {:<8} ceiling {:.2}  refresh {}s  {}",
            target.store,
            state,
            target.price_ceiling(global),
            target.refresh_interval(global).as_secs(),
            target.url
        );
    }
    out
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
