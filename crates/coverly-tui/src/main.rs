//! `coverly-tui`: terminal control panel for motorized shutters.
//!
//! Built on [ratatui](https://ratatui.rs) around `coverly-core`'s [`Panel`]
//! reducer. Three screens are navigable via number keys (1-3): Devices,
//! Remotes, and Console. The operator log and connection state stay
//! visible below every screen.
//!
//! Logs are written to a file (default `/tmp/coverly-tui.log`) to avoid
//! corrupting the terminal UI. The push channel runs on a background task
//! and feeds the same queue as HTTP results.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.
//!
//! [`Panel`]: coverly_core::Panel

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use coverly_config::ConfigError;
use coverly_core::PanelConfig;

use crate::app::App;

/// Terminal control panel for motorized shutters.
#[derive(Parser, Debug)]
#[command(name = "coverly-tui", version, about)]
struct Cli {
    /// Controller profile to use
    #[arg(short = 'p', long, env = "COVERLY_PROFILE")]
    profile: Option<String>,

    /// Controller URL (bypasses profiles, e.g. http://192.168.1.40)
    #[arg(short = 'u', long, env = "COVERLY_URL")]
    url: Option<String>,

    /// Log file path (defaults to /tmp/coverly-tui.log)
    #[arg(long, default_value = "/tmp/coverly-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal UI owns them. The returned guard flushes on drop and must be
/// held for the lifetime of the application.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("COVERLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "coverly_tui={log_level},coverly_core={log_level},coverly_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("coverly-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the panel config: `--url` first, then the named or default profile.
fn resolve_config(cli: &Cli) -> Result<PanelConfig> {
    let cfg = coverly_config::load_config().wrap_err("failed to load configuration")?;

    if let Some(raw) = cli.url.as_deref() {
        let mut config = PanelConfig::new(coverly_config::parse_url(raw)?);
        config.timeout = std::time::Duration::from_secs(cfg.defaults.timeout_secs);
        return Ok(config);
    }

    match cfg.panel_config(cli.profile.as_deref()) {
        Ok(config) => Ok(config),
        Err(ConfigError::UnknownProfile { .. } | ConfigError::NoProfile) => Err(eyre!(
            "no controller configured; pass --url or run `coverly config init --controller <URL>` \
             (config: {})",
            coverly_config::config_path().display()
        )),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; the guard flushes logs on exit
    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(
        url = %config.url,
        reconnect = config.reconnect.is_some(),
        log_capacity = config.log_capacity,
        "starting coverly-tui"
    );

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
