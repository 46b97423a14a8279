//! Controller status: last heard remote address and the log buffer.

use serde::Serialize;

use coverly_core::CommandClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct LastAddress {
    address: String,
}

pub async fn last_address(client: &CommandClient, global: &GlobalOpts) -> Result<(), CliError> {
    let address = client.fetch_last_address().await?;
    let reply = LastAddress { address };
    let out = output::render_single(
        &global.output,
        &reply,
        |r| {
            if r.address.is_empty() {
                "No remote heard yet.".into()
            } else {
                r.address.clone()
            }
        },
        |r| r.address.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn logs(client: &CommandClient, global: &GlobalOpts) -> Result<(), CliError> {
    let lines = client.api().logs().await?;
    let out = output::render_single(&global.output, &lines, |l| l.join("\n"), |l| l.join("\n"));
    output::print_output(&out, global.quiet);
    Ok(())
}
