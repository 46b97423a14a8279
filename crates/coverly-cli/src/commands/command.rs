//! Raw controller command.

use coverly_core::{Command, CommandClient, CommandTarget, DeviceId, RemoteId};

use crate::cli::{CommandArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

fn target(args: &CommandArgs) -> CommandTarget {
    match (&args.device, &args.remote) {
        (Some(device), _) => CommandTarget::Device(DeviceId::from(device.as_str())),
        (None, Some(remote)) => CommandTarget::Remote(RemoteId::from(remote.as_str())),
        (None, None) => CommandTarget::None,
    }
}

pub async fn handle(
    client: &CommandClient,
    args: CommandArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = target(&args);
    let command = Command::Raw(args.text.join(" "));
    tracing::debug!(%command, ?target, "sending command");
    let outcome = client.send_command(&target, &command).await;
    util::report_outcome(global, &outcome, "Command sent.")
}
