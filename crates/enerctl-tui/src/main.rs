//! `enerctl-tui`: interactive terminal console for the energy-monitoring
//! backend.
//!
//! Built on [ratatui](https://ratatui.rs). Three screens are reachable
//! with number keys: Users (1), Devices (2) and Reports (3). Each resource
//! screen follows its `enerctl-core` controller through a `watch` channel,
//! bridged into the TUI action loop by a background task.
//!
//! Logs go to a file (default `/tmp/enerctl-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use enerctl_core::{Console, ConsoleConfig};

use crate::app::App;

/// Terminal console for managing users and devices.
#[derive(Parser, Debug)]
#[command(name = "enerctl-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "ENERCTL_PROFILE")]
    profile: Option<String>,

    /// Backend base URL (overrides the profile), e.g. http://localhost:8080
    #[arg(short = 'u', long, env = "ENERCTL_API_URL")]
    api_url: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/enerctl-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be written to stdout/stderr while the
/// UI owns the terminal. Hold the returned guard until exit so buffered
/// lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "enerctl_tui={log_level},enerctl_core={log_level},enerctl_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("enerctl-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the backend settings: config file profile first, then flags.
fn build_console_config(cli: &Cli) -> Result<ConsoleConfig> {
    let cfg = enerctl_config::load_config_or_default();
    let (profile_name, mut profile) = cfg
        .resolve_profile(cli.profile.as_deref())
        .map_err(|e| eyre!("{e}"))?;

    if let Some(ref url) = cli.api_url {
        profile.api_url.clone_from(url);
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }

    enerctl_config::profile_to_console_config(&profile, cfg.defaults.timeout)
        .map_err(|e| eyre!("profile '{profile_name}': {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches modes so early panics
    // still print cleanly.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_console_config(&cli)?;
    info!(url = %config.base_url, "starting enerctl-tui");

    let console = Console::new(config).wrap_err("failed to set up the HTTP client")?;
    let mut app = App::new(console);
    app.run().await
}
