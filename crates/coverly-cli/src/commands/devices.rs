//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use coverly_core::view::{self, DeviceRow};
use coverly_core::{CommandClient, DeviceId, FillSplit};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const BAR_WIDTH: u16 = 10;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct DeviceListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Position", display_with = "fill_bar")]
    position: u8,
    #[tabled(rename = "Travel", display_with = "seconds")]
    travel_time: u32,
    #[tabled(rename = "Paired", display_with = "yes_no")]
    paired: bool,
    #[tabled(rename = "Active", display_with = "yes_no")]
    active: bool,
}

impl From<DeviceRow> for DeviceListRow {
    fn from(row: DeviceRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            position: row.fill.filled_percent(),
            travel_time: row.travel_time,
            paired: row.paired,
            active: row.active,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn fill_bar(percent: &u8) -> String {
    let (filled, unfilled) = FillSplit::new(i64::from(*percent)).cells(BAR_WIDTH);
    format!(
        "{}{} {percent:>3}%",
        "█".repeat(usize::from(filled)),
        "░".repeat(usize::from(unfilled))
    )
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn seconds(value: &u32) -> String {
    if *value == 0 {
        "-".into()
    } else {
        format!("{value}s")
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn yes_no(value: &bool) -> String {
    if *value { "Yes" } else { "No" }.into()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &CommandClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let registry = util::load_registry(client, false).await?;
            let rows: Vec<DeviceListRow> = view::device_rows(&registry)
                .into_iter()
                .map(DeviceListRow::from)
                .collect();
            let out = output::render_list(&global.output, &rows, view::NO_DEVICES, |r| {
                r.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Action { device, action } => {
            let action = util::motion(action);
            tracing::debug!(%device, %action, "sending device action");
            let outcome = client.send_action(&DeviceId::from(device), action).await;
            util::report_outcome(global, &outcome, &format!("{action} requested"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_bar_rounds_to_cells() {
        assert_eq!(fill_bar(&40), "████░░░░░░  40%");
        assert_eq!(fill_bar(&0), "░░░░░░░░░░   0%");
        assert_eq!(fill_bar(&100), "██████████ 100%");
    }

    #[test]
    fn zero_travel_time_is_unknown() {
        assert_eq!(seconds(&0), "-");
        assert_eq!(seconds(&25), "25s");
    }
}
