mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use coverly_config::{self as config, Config, ConfigError};
use coverly_core::{CommandClient, PanelConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("COVERLY_LOG").unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "coverly", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require a controller
        cmd => {
            let cfg = config::load_config()?;
            let panel_config = build_panel_config(&cli.global, &cfg)?;
            let client = CommandClient::from_config(&panel_config)?;

            tracing::debug!(command = ?cmd, url = %panel_config.url, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

/// Build a `PanelConfig` from the config file, profile, and CLI overrides.
///
/// `--url` bypasses profiles entirely; otherwise the named (or default)
/// profile must exist.
fn build_panel_config(global: &GlobalOpts, cfg: &Config) -> Result<PanelConfig, CliError> {
    let mut panel = if let Some(ref raw) = global.url {
        let mut panel = PanelConfig::new(config::parse_url(raw)?);
        panel.timeout = Duration::from_secs(cfg.defaults.timeout_secs);
        panel
    } else {
        match cfg.panel_config(global.profile.as_deref()) {
            Ok(panel) => panel,
            Err(ConfigError::UnknownProfile { name }) if !cfg.profiles.is_empty() => {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                });
            }
            Err(ConfigError::UnknownProfile { .. } | ConfigError::NoProfile) => {
                return Err(CliError::NoConfig {
                    path: config::config_path().display().to_string(),
                });
            }
            Err(other) => return Err(other.into()),
        }
    };

    if let Some(secs) = global.timeout {
        panel.timeout = Duration::from_secs(secs);
    }
    Ok(panel)
}
