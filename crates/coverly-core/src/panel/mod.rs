//! The panel reducer.
//!
//! [`Panel`] owns the registry, the operator log and the dialog controller,
//! and [`Panel::update`] is the only place any of them change. Every
//! input (operator keys, push events, finished network calls) arrives as an
//! [`Intent`]; anything that needs I/O leaves as an [`Effect`].

pub mod dialogs;
pub mod effect;

use coverly_api::{ChannelEvent, DeviceAction, PushEvent};
use tracing::{debug, trace};

pub use dialogs::HelpTopic;
pub use effect::{CommandStep, Effect, Report};

use crate::client::CommandOutcome;
use crate::command::{Command, CommandTarget};
use crate::config::PanelConfig;
use crate::dialog::{DialogController, DialogEvent, SessionId};
use crate::error::CoreError;
use crate::log::OperatorLog;
use crate::model::{Device, DeviceId, Remote, RemoteId};
use crate::registry::{Registry, ReloadKind, ReloadOutcome, ReloadTicket};
use crate::view::{self, DeviceRow, RemoteRow, SelectOption};

/// Everything that can change panel state.
#[derive(Debug)]
pub enum Intent {
    /// First intent after launch.
    Startup,
    Reload(ReloadKind),
    DevicesLoaded {
        ticket: ReloadTicket,
        result: Result<Vec<Device>, CoreError>,
    },
    RemotesLoaded {
        ticket: ReloadTicket,
        result: Result<Vec<Remote>, CoreError>,
    },
    LastAddressLoaded(Result<String, CoreError>),
    Channel(ChannelEvent),

    DeviceAction {
        device: DeviceId,
        action: DeviceAction,
    },
    ActionFinished(CommandOutcome),

    OpenEditDevice(DeviceId),
    OpenEditRemote(RemoteId),
    OpenAddDevice,
    OpenAddRemote,
    OpenHelp(HelpTopic),
    Dialog(DialogEvent),

    /// Raw command typed into the console.
    ConsoleSend {
        device: Option<DeviceId>,
        command: String,
    },
    CommandFinished {
        report: Report,
        outcome: CommandOutcome,
        reload: Option<ReloadKind>,
    },
    DeleteFinished {
        session: SessionId,
        report: Report,
        outcome: CommandOutcome,
        reload: Option<ReloadKind>,
    },
}

/// Push-channel state shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    Retrying { attempt: u32 },
    /// Down. A `Retrying` follows if reconnect is enabled.
    Offline,
}

#[derive(Debug)]
pub struct Panel {
    registry: Registry,
    log: OperatorLog,
    dialog: DialogController<Effect>,
    link: LinkState,
    /// The current outage has already been written to the log.
    outage_logged: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self::with_log(OperatorLog::default())
    }
}

impl Panel {
    pub fn new(config: &PanelConfig) -> Self {
        Self::with_log(OperatorLog::with_capacity(config.log_capacity))
    }

    fn with_log(log: OperatorLog) -> Self {
        Self {
            registry: Registry::new(),
            log,
            dialog: DialogController::new(),
            link: LinkState::Connecting,
            outage_logged: false,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn log(&self) -> &OperatorLog {
        &self.log
    }

    pub fn dialog(&self) -> &DialogController<Effect> {
        &self.dialog
    }

    pub fn link_state(&self) -> &LinkState {
        &self.link
    }

    pub fn device_rows(&self) -> Vec<DeviceRow> {
        view::device_rows(&self.registry)
    }

    pub fn device_options(&self) -> Vec<SelectOption> {
        view::device_options(&self.registry)
    }

    pub fn remote_rows(&self) -> Vec<RemoteRow> {
        view::remote_rows(&self.registry)
    }

    // ── Reducer ──────────────────────────────────────────────────────

    pub fn update(&mut self, intent: Intent) -> Vec<Effect> {
        trace!(?intent, "panel update");
        match intent {
            Intent::Startup => {
                self.log.info("System started");
                self.log.info("Loading devices...");
                vec![
                    self.reload(ReloadKind::Devices),
                    self.reload(ReloadKind::Remotes),
                    Effect::FetchLastAddress,
                ]
            }
            Intent::Reload(kind) => vec![self.reload(kind)],
            Intent::DevicesLoaded { ticket, result } => {
                self.devices_loaded(ticket, result);
                Vec::new()
            }
            Intent::RemotesLoaded { ticket, result } => {
                self.remotes_loaded(ticket, result);
                Vec::new()
            }
            Intent::LastAddressLoaded(result) => {
                match result {
                    Ok(address) => {
                        self.registry.set_last_address(address);
                    }
                    Err(e) => debug!(error = %e, "last address unavailable"),
                }
                Vec::new()
            }
            Intent::Channel(event) => self.channel_event(event),

            Intent::DeviceAction { device, action } => vec![Effect::Action { device, action }],
            Intent::ActionFinished(outcome) => {
                if !outcome.message.trim().is_empty() {
                    if outcome.success {
                        self.log.info(outcome.message);
                    } else {
                        self.log.error(outcome.message);
                    }
                }
                Vec::new()
            }

            Intent::OpenEditDevice(id) => {
                match self.registry.device(&id) {
                    Some(device) => {
                        let opening = dialogs::edit_device(device);
                        self.open_dialog(opening);
                    }
                    None => debug!(%id, "edit requested for unknown device"),
                }
                Vec::new()
            }
            Intent::OpenEditRemote(id) => {
                match self.registry.remote(&id) {
                    Some(remote) => {
                        let opening = dialogs::edit_remote(remote);
                        self.open_dialog(opening);
                    }
                    None => debug!(%id, "edit requested for unknown remote"),
                }
                Vec::new()
            }
            Intent::OpenAddDevice => {
                self.open_dialog(dialogs::add_device());
                Vec::new()
            }
            Intent::OpenAddRemote => {
                let opening = dialogs::add_remote(self.registry.last_address());
                self.open_dialog(opening);
                Vec::new()
            }
            Intent::OpenHelp(topic) => {
                self.open_dialog(dialogs::help(topic));
                Vec::new()
            }
            Intent::Dialog(event) => {
                let reply = self.dialog.handle(event);
                if let Some(message) = reply.rejected {
                    self.log.error(message);
                }
                reply.effects
            }

            Intent::ConsoleSend { device, command } => self.console_send(device, &command),
            Intent::CommandFinished {
                report,
                outcome,
                reload,
            } => {
                let (level, line) = report.line(&outcome);
                self.log.push(level, line);
                reload.map(|kind| self.reload(kind)).into_iter().collect()
            }
            Intent::DeleteFinished {
                session,
                report,
                outcome,
                reload,
            } => {
                if outcome.success {
                    let (level, line) = report.line(&outcome);
                    self.log.push(level, line);
                } else {
                    self.log.error(format!(
                        "Error deleting: {}",
                        outcome.message_or(report.failure_fallback())
                    ));
                }
                self.dialog.delete_finished(session, outcome.success);
                reload.map(|kind| self.reload(kind)).into_iter().collect()
            }
        }
    }

    fn reload(&mut self, kind: ReloadKind) -> Effect {
        let ticket = self.registry.begin_reload(kind);
        match kind {
            ReloadKind::Devices => Effect::FetchDevices(ticket),
            ReloadKind::Remotes => Effect::FetchRemotes(ticket),
        }
    }

    fn open_dialog(&mut self, (options, callbacks): dialogs::Opening) {
        let picker = if options.show_device_picker {
            view::device_options(&self.registry)
        } else {
            Vec::new()
        };
        self.dialog.open(options, callbacks, picker);
    }

    fn devices_loaded(&mut self, ticket: ReloadTicket, result: Result<Vec<Device>, CoreError>) {
        match result {
            Ok(devices) => match self.registry.finish_device_reload(ticket, devices) {
                ReloadOutcome::Applied { count: 0 } => self.log.info("No devices found."),
                ReloadOutcome::Applied { .. } => self.log.info("Device list updated."),
                ReloadOutcome::Stale => {}
            },
            Err(e) => {
                self.registry.abandon_reload(ticket);
                self.log.error(format!("Error fetching devices: {e}"));
            }
        }
    }

    fn remotes_loaded(&mut self, ticket: ReloadTicket, result: Result<Vec<Remote>, CoreError>) {
        match result {
            Ok(remotes) => {
                self.registry.finish_remote_reload(ticket, remotes);
            }
            Err(e) => {
                self.registry.abandon_reload(ticket);
                self.log.error(format!("Error fetching remotes: {e}"));
            }
        }
    }

    fn channel_event(&mut self, event: ChannelEvent) -> Vec<Effect> {
        match event {
            ChannelEvent::Connected => {
                self.link = LinkState::Connected;
                self.outage_logged = false;
                self.log.info("WebSocket connected");
                Vec::new()
            }
            ChannelEvent::Disconnected { reason } => {
                debug!(reason = reason.as_deref().unwrap_or("closed"), "push channel down");
                if !self.outage_logged {
                    self.outage_logged = true;
                    self.log.error("WebSocket disconnected");
                }
                self.link = LinkState::Offline;
                Vec::new()
            }
            ChannelEvent::Retrying { attempt, delay } => {
                debug!(attempt, ?delay, "push channel retrying");
                self.link = LinkState::Retrying { attempt };
                Vec::new()
            }
            ChannelEvent::Push(push) => self.push_event(push),
        }
    }

    fn push_event(&mut self, push: PushEvent) -> Vec<Effect> {
        match push {
            PushEvent::Log { message } => {
                self.log.info(message);
                Vec::new()
            }
            PushEvent::Position { id, position } => {
                self.registry
                    .apply_position_patch(&DeviceId::from(id), position);
                Vec::new()
            }
            PushEvent::Init { logs } => {
                for line in logs {
                    self.log.info(line);
                }
                vec![self.reload(ReloadKind::Devices)]
            }
            PushEvent::LastAddr { address } => {
                self.registry.set_last_address(address.unwrap_or_default());
                Vec::new()
            }
            PushEvent::Unknown => Vec::new(),
        }
    }

    fn console_send(&mut self, device: Option<DeviceId>, command: &str) -> Vec<Effect> {
        let Some(device) = device.filter(|d| !d.is_empty()) else {
            self.log.error("Please select a device.");
            return Vec::new();
        };
        let command = command.trim();
        if command.is_empty() {
            self.log.error("Please enter a command.");
            return Vec::new();
        }
        self.log.info(format!(
            "Sending command \"{command}\" to device ID {device}..."
        ));
        vec![Effect::command(CommandStep::new(
            CommandTarget::Device(device),
            Command::Raw(command.to_owned()),
            Report::Console,
        ))]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dialog::{Button, Mode};

    fn lounge(position: u8) -> Device {
        Device {
            id: DeviceId::from("d1"),
            name: "Lounge".into(),
            position,
            travel_time: 20,
            paired: true,
            active: true,
            description: None,
        }
    }

    fn ticket_of(effects: &[Effect], kind: ReloadKind) -> ReloadTicket {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchDevices(t) | Effect::FetchRemotes(t) if t.kind() == kind => Some(*t),
                _ => None,
            })
            .unwrap()
    }

    fn loaded_panel() -> Panel {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Startup);
        let ticket = ticket_of(&effects, ReloadKind::Devices);
        panel.update(Intent::DevicesLoaded {
            ticket,
            result: Ok(vec![lounge(40)]),
        });
        panel
    }

    #[test]
    fn startup_logs_and_fetches() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Startup);
        assert_eq!(panel.log().messages(), ["System started", "Loading devices..."]);
        assert_eq!(effects.len(), 3);
        assert!(effects.contains(&Effect::FetchLastAddress));
        assert!(panel.registry().is_loading(ReloadKind::Devices));
        assert!(panel.registry().is_loading(ReloadKind::Remotes));
    }

    #[test]
    fn empty_and_failed_device_fetches() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Reload(ReloadKind::Devices));
        panel.update(Intent::DevicesLoaded {
            ticket: ticket_of(&effects, ReloadKind::Devices),
            result: Ok(Vec::new()),
        });
        assert_eq!(panel.log().last().unwrap().message, "No devices found.");

        let effects = panel.update(Intent::Reload(ReloadKind::Devices));
        panel.update(Intent::DevicesLoaded {
            ticket: ticket_of(&effects, ReloadKind::Devices),
            result: Err(CoreError::Api {
                message: "HTTP error! status: 500".into(),
                status: Some(500),
            }),
        });
        assert_eq!(
            panel.log().last().unwrap().message,
            "Error fetching devices: HTTP error! status: 500"
        );
        assert!(!panel.registry().is_loading(ReloadKind::Devices));
    }

    #[test]
    fn failed_fetch_keeps_previous_devices() {
        let mut panel = loaded_panel();
        let effects = panel.update(Intent::Reload(ReloadKind::Devices));
        panel.update(Intent::DevicesLoaded {
            ticket: ticket_of(&effects, ReloadKind::Devices),
            result: Err(CoreError::Timeout),
        });
        assert_eq!(panel.registry().device_count(), 1);
    }

    #[test]
    fn position_before_fetch_is_a_noop() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Startup);
        panel.update(Intent::Channel(ChannelEvent::Push(PushEvent::Position {
            id: "d1".into(),
            position: 75,
        })));
        assert_eq!(panel.registry().device_count(), 0);

        panel.update(Intent::DevicesLoaded {
            ticket: ticket_of(&effects, ReloadKind::Devices),
            result: Ok(vec![lounge(40)]),
        });
        assert_eq!(panel.device_rows()[0].fill.filled_percent(), 40);
    }

    #[test]
    fn position_push_patches_known_device() {
        let mut panel = loaded_panel();
        panel.update(Intent::Channel(ChannelEvent::Push(PushEvent::Position {
            id: "d1".into(),
            position: 75,
        })));
        assert_eq!(panel.device_rows()[0].fill.filled_percent(), 75);
    }

    #[test]
    fn init_replays_logs_then_reloads_devices() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::Channel(ChannelEvent::Push(PushEvent::Init {
            logs: vec!["boot".into(), "radio ready".into()],
        })));
        assert_eq!(panel.log().messages(), ["boot", "radio ready"]);
        assert!(matches!(effects.as_slice(), [Effect::FetchDevices(_)]));
    }

    #[test]
    fn outage_is_logged_once() {
        let mut panel = Panel::default();
        panel.update(Intent::Channel(ChannelEvent::Connected));
        panel.update(Intent::Channel(ChannelEvent::Disconnected { reason: None }));
        panel.update(Intent::Channel(ChannelEvent::Retrying {
            attempt: 1,
            delay: Duration::from_secs(1),
        }));
        panel.update(Intent::Channel(ChannelEvent::Disconnected { reason: None }));
        assert_eq!(
            panel.log().messages(),
            ["WebSocket connected", "WebSocket disconnected"]
        );
        assert_eq!(*panel.link_state(), LinkState::Offline);

        panel.update(Intent::Channel(ChannelEvent::Connected));
        assert_eq!(*panel.link_state(), LinkState::Connected);
    }

    #[test]
    fn last_address_from_push_prefills_add_remote() {
        let mut panel = Panel::default();
        panel.update(Intent::Channel(ChannelEvent::Push(PushEvent::LastAddr {
            address: Some("0A1B2C".into()),
        })));
        panel.update(Intent::OpenAddRemote);
        assert_eq!(panel.dialog().current().unwrap().text(), "0A1B2C");
    }

    #[test]
    fn console_validates_then_sends() {
        let mut panel = Panel::default();
        assert!(panel
            .update(Intent::ConsoleSend {
                device: None,
                command: "add".into(),
            })
            .is_empty());
        assert!(panel
            .update(Intent::ConsoleSend {
                device: Some(DeviceId::from("d1")),
                command: "  ".into(),
            })
            .is_empty());
        let effects = panel.update(Intent::ConsoleSend {
            device: Some(DeviceId::from("d1")),
            command: " add ".into(),
        });
        assert_eq!(
            panel.log().messages(),
            [
                "Please select a device.",
                "Please enter a command.",
                "Sending command \"add\" to device ID d1...",
            ]
        );
        assert_eq!(
            effects,
            [Effect::command(CommandStep::new(
                CommandTarget::Device(DeviceId::from("d1")),
                Command::Raw("add".into()),
                Report::Console,
            ))]
        );
    }

    #[test]
    fn command_finished_logs_and_reloads() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::CommandFinished {
            report: Report::outcome("Device added.", "Failed to add device."),
            outcome: CommandOutcome::ok("Device added."),
            reload: Some(ReloadKind::Devices),
        });
        assert_eq!(panel.log().messages(), ["Device added."]);
        assert!(matches!(effects.as_slice(), [Effect::FetchDevices(_)]));
    }

    #[test]
    fn failed_delete_stays_in_confirm() {
        let mut panel = loaded_panel();
        panel.update(Intent::OpenEditDevice(DeviceId::from("d1")));
        panel.update(Intent::Dialog(DialogEvent::Press(Button::Delete)));
        let effects = panel.update(Intent::Dialog(DialogEvent::Press(Button::Confirm)));
        let [Effect::Delete { session, step, .. }] = effects.as_slice() else {
            panic!("expected delete effect, got {effects:?}");
        };

        let reload = panel.update(Intent::DeleteFinished {
            session: *session,
            report: step.report,
            outcome: CommandOutcome::failed(""),
            reload: None,
        });
        assert!(reload.is_empty());
        assert_eq!(panel.log().last().unwrap().message, "Error deleting: Delete failed");
        assert_eq!(
            panel.dialog().current().unwrap().mode(),
            Mode::DeleteConfirm { awaiting: false }
        );
    }

    #[test]
    fn successful_delete_closes_and_reloads() {
        let mut panel = loaded_panel();
        panel.update(Intent::OpenEditDevice(DeviceId::from("d1")));
        panel.update(Intent::Dialog(DialogEvent::Press(Button::Delete)));
        let effects = panel.update(Intent::Dialog(DialogEvent::Press(Button::Confirm)));
        let [Effect::Delete { session, step, .. }] = effects.as_slice() else {
            panic!("expected delete effect");
        };
        let after = panel.update(Intent::DeleteFinished {
            session: *session,
            report: step.report,
            outcome: CommandOutcome::ok(""),
            reload: step.reload_on_success,
        });
        assert_eq!(panel.log().last().unwrap().message, "Device deleted.");
        assert!(!panel.dialog().is_open());
        assert!(matches!(after.as_slice(), [Effect::FetchDevices(_)]));
    }

    #[test]
    fn rejected_save_is_logged() {
        let mut panel = Panel::default();
        panel.update(Intent::OpenAddRemote);
        let effects = panel.update(Intent::Dialog(DialogEvent::Press(Button::Save)));
        assert!(effects.is_empty());
        assert!(panel.dialog().is_open());
        assert_eq!(panel.log().messages(), ["Please provide a remote ID."]);
    }

    #[test]
    fn edit_unknown_device_opens_nothing() {
        let mut panel = Panel::default();
        panel.update(Intent::OpenEditDevice(DeviceId::from("nope")));
        assert!(!panel.dialog().is_open());
    }

    #[test]
    fn action_message_is_logged() {
        let mut panel = Panel::default();
        let effects = panel.update(Intent::DeviceAction {
            device: DeviceId::from("d1"),
            action: DeviceAction::Open,
        });
        assert_eq!(
            effects,
            [Effect::Action {
                device: DeviceId::from("d1"),
                action: DeviceAction::Open,
            }]
        );
        panel.update(Intent::ActionFinished(CommandOutcome::ok("Opening Lounge")));
        assert_eq!(panel.log().messages(), ["Opening Lounge"]);
    }
}
