//! Shared helpers for command handlers.

use std::path::Path;

use serde::Serialize;

use coverly_api::FileKind;
use coverly_core::{CommandClient, CommandOutcome, DeviceAction, Registry, ReloadKind};

use crate::cli::{GlobalOpts, MapKind, MotionArg, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Fetch devices (and optionally remotes) into a fresh registry so list
/// views resolve remote links the same way the panel does.
pub async fn load_registry(
    client: &CommandClient,
    with_remotes: bool,
) -> Result<Registry, CliError> {
    let mut registry = Registry::new();

    let ticket = registry.begin_reload(ReloadKind::Devices);
    let devices = client.fetch_devices().await?;
    registry.finish_device_reload(ticket, devices);

    if with_remotes {
        let ticket = registry.begin_reload(ReloadKind::Remotes);
        let remotes = client.fetch_remotes().await?;
        registry.finish_remote_reload(ticket, remotes);
    }
    Ok(registry)
}

pub fn motion(arg: MotionArg) -> DeviceAction {
    match arg {
        MotionArg::Open => DeviceAction::Open,
        MotionArg::Stop => DeviceAction::Stop,
        MotionArg::Close => DeviceAction::Close,
    }
}

pub fn file_kind(kind: MapKind) -> FileKind {
    match kind {
        MapKind::Devices => FileKind::Devices,
        MapKind::Remotes => FileKind::Remotes,
    }
}

#[derive(Debug, Serialize)]
struct Reply<'a> {
    success: bool,
    message: &'a str,
}

/// Print a command or action outcome, or turn a failure into an error.
///
/// Table output goes to stderr as a status line; JSON goes to stdout so
/// scripts can read it.
pub fn report_outcome(
    global: &GlobalOpts,
    outcome: &CommandOutcome,
    fallback: &str,
) -> Result<(), CliError> {
    if !outcome.success {
        return Err(CliError::Rejected {
            message: outcome.message_or("Command failed").to_owned(),
        });
    }
    let message = outcome.message_or(fallback);
    let reply = Reply {
        success: true,
        message,
    };
    let out = output::render_single(
        &global.output,
        &reply,
        |r| output::status_line(true, r.message, output::should_color(&global.color)),
        |r| r.message.to_owned(),
    );
    match global.output {
        OutputFormat::Table if !global.quiet => eprintln!("{out}"),
        OutputFormat::Table => {}
        _ => output::print_output(&out, global.quiet),
    }
    Ok(())
}

/// Read a file and check that it parses as JSON before it is uploaded.
pub fn read_json_file(path: &Path) -> Result<Vec<u8>, CliError> {
    let contents = std::fs::read(path)?;
    serde_json::from_slice::<serde_json::Value>(&contents)?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use super::*;

    #[test]
    fn read_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            read_json_file(file.path()),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn read_json_file_returns_raw_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"d1":{"name":"Lounge"}}"#).unwrap();
        assert_eq!(
            read_json_file(file.path()).unwrap(),
            br#"{"d1":{"name":"Lounge"}}"#
        );
    }

    #[test]
    fn map_kinds_use_controller_file_names() {
        assert_eq!(file_kind(MapKind::Devices).default_file_name(), "1W.json");
        assert_eq!(
            file_kind(MapKind::Remotes).default_file_name(),
            "RemoteMap.json"
        );
    }
}
