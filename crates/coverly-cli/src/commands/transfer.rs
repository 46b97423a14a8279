//! Export and import of the controller's device and remote maps.

use std::path::PathBuf;

use coverly_core::CommandClient;

use crate::cli::{ExportArgs, GlobalOpts, ImportArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn export(
    client: &CommandClient,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = util::file_kind(args.kind);
    let path = args
        .file
        .unwrap_or_else(|| PathBuf::from(kind.default_file_name()));

    let bytes = client.api().download(kind).await?;
    std::fs::write(&path, &bytes)?;
    tracing::info!(%kind, bytes = bytes.len(), path = %path.display(), "map exported");

    if !global.quiet {
        let message = format!("Saved {} ({} bytes)", path.display(), bytes.len());
        eprintln!(
            "{}",
            output::status_line(true, &message, output::should_color(&global.color))
        );
    }
    Ok(())
}

pub async fn import(
    client: &CommandClient,
    args: ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = util::file_kind(args.kind);
    let contents = util::read_json_file(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(kind.default_file_name())
        .to_owned();

    let reply = client.api().upload(kind, &file_name, contents).await?;
    tracing::info!(%kind, file = %file_name, "map imported");

    if !global.quiet {
        let message = reply.message.as_deref().unwrap_or("Upload complete.");
        eprintln!(
            "{}",
            output::status_line(true, message, output::should_color(&global.color))
        );
    }
    Ok(())
}
