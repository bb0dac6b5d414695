// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stockwatch - watches store pages and alerts when products come in stock
//! under a price ceiling.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sw_core::Config;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::lifecycle::{setup_logging, startup, summary, write_startup_error, write_startup_marker};

#[derive(Parser)]
#[command(
    name = "stockwatch",
    version,
    about = "Watch store pages and alert when products are in stock"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, short, global = true, default_value = "stockwatch.toml")]
    config: PathBuf,

    /// Mirror the log to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch every enabled target until interrupted
    Run,
    /// Validate the config and print a summary
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Check => {
            println!("config OK: {}", cli.config.display());
            print!("{}", summary(&config));
            Ok(())
        }
        Commands::Run => run(config, cli.verbose).await,
    }
}

async fn run(config: Config, verbose: bool) -> Result<()> {
    let log_path = config.global.log_file.clone();
    let verbose = verbose || config.global.verbose;

    // Marker goes in before the subscriber so each run is easy to find.
    write_startup_marker(&log_path)?;
    let _log_guard = setup_logging(&log_path, verbose)?;

    let supervisor = match startup(config) {
        Ok(supervisor) => supervisor,
        Err(e) => {
            write_startup_error(&log_path, &e);
            error!("failed to start: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = supervisor.run() => {
            if let Err(e) = result {
                error!("supervisor stopped: {}", e);
                return Err(e.into());
            }
            info!("all watches stopped");
        }
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    info!("stockwatch stopped");
    Ok(())
}
