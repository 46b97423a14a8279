//! Remote command handlers.

use serde::Serialize;
use tabled::Tabled;

use coverly_core::CommandClient;
use coverly_core::view::{self, RemoteRow};

use crate::cli::{GlobalOpts, RemotesArgs, RemotesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize, Tabled)]
struct RemoteListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Devices", display_with = "linked_cell")]
    devices: Vec<String>,
}

impl From<RemoteRow> for RemoteListRow {
    fn from(row: RemoteRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            devices: row.linked,
        }
    }
}

fn linked_cell(devices: &[String]) -> String {
    if devices.is_empty() {
        view::NO_LINKED_DEVICES.to_owned()
    } else {
        devices.join(", ")
    }
}

pub async fn handle(
    client: &CommandClient,
    args: RemotesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RemotesCommand::List => {
            let registry = util::load_registry(client, true).await?;
            let rows: Vec<RemoteListRow> = view::remote_rows(&registry)
                .into_iter()
                .map(RemoteListRow::from)
                .collect();
            let out = output::render_list(&global.output, &rows, view::NO_REMOTES, |r| {
                r.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
