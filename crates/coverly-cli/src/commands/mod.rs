//! Command dispatch: bridges CLI args -> core client calls -> output formatting.

pub mod command;
pub mod config_cmd;
pub mod controller;
pub mod devices;
pub mod mqtt;
pub mod remotes;
pub mod transfer;
pub mod util;

use coverly_core::CommandClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &CommandClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Remotes(args) => remotes::handle(client, args, global).await,
        Command::Command(args) => command::handle(client, args, global).await,
        Command::Mqtt(args) => mqtt::handle(client, args, global).await,
        Command::Lastaddr => controller::last_address(client, global).await,
        Command::Logs => controller::logs(client, global).await,
        Command::Export(args) => transfer::export(client, args, global).await,
        Command::Import(args) => transfer::import(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
