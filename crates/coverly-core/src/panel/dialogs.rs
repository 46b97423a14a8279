// ── Dialog call sites ──
//
// Each function builds the options and callbacks for one way of opening
// the shared dialog. Callbacks capture what they need by value and return
// effects; nothing here touches the network.

use strum::Display;

use super::effect::{CommandStep, Effect, Report};
use crate::command::{Command, CommandTarget};
use crate::dialog::{DialogCallbacks, DialogOptions, SaveValues, SessionId};
use crate::model::{Device, DeviceId, Remote, RemoteId};
use crate::registry::ReloadKind;

pub type Opening = (DialogOptions, DialogCallbacks<Effect>);

const DEVICE_PAIR_LABEL: &str = "Add / Remove the device to the physical screen";
const DEVICE_DELETE_INFO: &str = "Only use when the device is not linked to a physical screen.";
const REMOTE_PAIR_LABEL: &str = "link / Unlink the remote";

/// Which help page to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HelpTopic {
    Devices,
    Remotes,
}

fn changed_name(values: &SaveValues, current: &str) -> Option<String> {
    let name = values.text.trim();
    (!name.is_empty() && name != current).then(|| name.to_owned())
}

// ── Devices ─────────────────────────────────────────────────────────

pub fn edit_device(device: &Device) -> Opening {
    let options = DialogOptions::new("Edit Device", "Adjust the name:")
        .items([
            format!("ID: {}", device.id),
            format!("Description: {}", device.description.as_deref().unwrap_or_default()),
            format!("Position: {}%", device.position),
            format!("Paired: {}", if device.paired { "Yes" } else { "No" }),
        ])
        .input(device.name.clone())
        .timing(device.travel_time.to_string())
        .numeric_timing()
        .boolean("Active", device.active)
        .save()
        .delete(Some(DEVICE_DELETE_INFO))
        .pairing(DEVICE_PAIR_LABEL, None, None);

    let id = device.id.clone();
    let name = device.name.clone();
    let travel_time = device.travel_time;
    let target = move || CommandTarget::Device(id.clone());

    let save_target = target.clone();
    let pair_target = target.clone();
    let unpair_target = target.clone();
    let delete_target = target;

    let callbacks = DialogCallbacks::new()
        .on_save(move |values: &SaveValues| {
            let mut steps = Vec::new();
            if let Some(new_name) = changed_name(values, &name) {
                steps.push(CommandStep::new(
                    save_target(),
                    Command::RenameDevice { name: new_name },
                    Report::outcome("Device renamed.", "Failed to rename device."),
                ));
            }
            let seconds = values
                .timing
                .as_deref()
                .and_then(|t| t.trim().parse::<u32>().ok())
                .filter(|&s| s > 0 && s != travel_time);
            if let Some(seconds) = seconds {
                steps.push(CommandStep::new(
                    save_target(),
                    Command::SetTravelTime { seconds },
                    Report::outcome("Travel time updated.", "Failed to update travel time."),
                ));
            }
            Ok(vec![Effect::Commands {
                steps,
                then_reload: Some(ReloadKind::Devices),
            }])
        })
        .on_pair(move |_| {
            vec![Effect::command(
                CommandStep::new(
                    pair_target(),
                    Command::Pair,
                    Report::outcome("Device added.", "Failed to add device."),
                )
                .reload_on_success(ReloadKind::Devices),
            )]
        })
        .on_unpair(move |_| {
            vec![Effect::command(
                CommandStep::new(
                    unpair_target(),
                    Command::Unpair,
                    Report::outcome("Device unpaired.", "Failed to unpair device."),
                )
                .reload_on_success(ReloadKind::Devices),
            )]
        })
        .on_delete(move |session: SessionId| {
            vec![Effect::Delete {
                session,
                step: CommandStep::new(
                    delete_target(),
                    Command::DeleteDevice,
                    Report::outcome("Device deleted.", "Delete failed"),
                )
                .reload_on_success(ReloadKind::Devices),
                always_reload: None,
            }]
        });

    (options, callbacks)
}

pub fn add_device() -> Opening {
    let options = DialogOptions::new("Add Device", "new device")
        .items(["here add your device"])
        .input("")
        .save();
    let callbacks = DialogCallbacks::new().on_save(|values: &SaveValues| {
        let name = values.text.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Effect::command(
            CommandStep::new(
                CommandTarget::None,
                Command::NewDevice {
                    name: name.to_owned(),
                },
                Report::outcome("Device added.", "Failed to add device."),
            )
            .reload_on_success(ReloadKind::Devices),
        )])
    });
    (options, callbacks)
}

// ── Remotes ─────────────────────────────────────────────────────────

pub fn edit_remote(remote: &Remote) -> Opening {
    let options = DialogOptions::new("Edit Remote", "Adjust the name/devices:")
        .items([format!("remote id: {}", remote.id), format!("name: {}", remote.name)])
        .input(remote.name.clone())
        .device_picker()
        .save()
        .delete(None)
        .pairing(REMOTE_PAIR_LABEL, Some("Link"), Some("Unlink"));

    let id = remote.id.clone();
    let name = remote.name.clone();

    let link_id = id.clone();
    let unlink_id = id.clone();
    let save_id = id.clone();
    let delete_id = id;

    let callbacks = DialogCallbacks::new()
        .on_pair(move |device: Option<DeviceId>| {
            vec![link_step(
                Command::LinkRemote {
                    remote: link_id.clone(),
                    device: device.unwrap_or_else(|| DeviceId::from("")),
                },
                Report::outcome("Device linked.", "Failed to link device."),
            )]
        })
        .on_unpair(move |device: Option<DeviceId>| {
            vec![link_step(
                Command::UnlinkRemote {
                    remote: unlink_id.clone(),
                    device: device.unwrap_or_else(|| DeviceId::from("")),
                },
                Report::outcome("Device unlinked.", "Failed to unlink device."),
            )]
        })
        .on_save(move |values: &SaveValues| {
            let Some(new_name) = changed_name(values, &name) else {
                return Ok(Vec::new());
            };
            Ok(vec![Effect::Commands {
                steps: vec![CommandStep::new(
                    CommandTarget::Remote(save_id.clone()),
                    Command::RenameRemote { name: new_name },
                    Report::outcome("Remote renamed.", "Failed to rename remote."),
                )],
                then_reload: Some(ReloadKind::Remotes),
            }])
        })
        .on_delete(move |session: SessionId| {
            vec![Effect::Delete {
                session,
                step: CommandStep::new(
                    CommandTarget::None,
                    Command::DeleteRemote {
                        remote: delete_id.clone(),
                    },
                    Report::outcome("Remote removed.", "Failed to remove remote."),
                ),
                always_reload: Some(ReloadKind::Remotes),
            }]
        });

    (options, callbacks)
}

fn link_step(command: Command, report: Report) -> Effect {
    Effect::Commands {
        steps: vec![CommandStep::new(CommandTarget::None, command, report)],
        then_reload: Some(ReloadKind::Remotes),
    }
}

/// `last_address` pre-fills the id field.
pub fn add_remote(last_address: &str) -> Opening {
    let options = DialogOptions::new("Add Remote", "Remote ID:")
        .items(["here add your remote"])
        .input(last_address.trim())
        .timing("")
        .timing_label("Remote Name:")
        .save();
    let callbacks = DialogCallbacks::new().on_save(|values: &SaveValues| {
        let remote = RemoteId::from(values.text.trim());
        if remote.is_empty() {
            return Err("Please provide a remote ID.".to_owned());
        }
        let name = values.timing.as_deref().unwrap_or_default().trim();
        if name.is_empty() {
            return Err("Please provide a remote name.".to_owned());
        }
        Ok(vec![Effect::command(
            CommandStep::new(
                CommandTarget::None,
                Command::NewRemote {
                    remote,
                    name: name.to_owned(),
                },
                Report::outcome("Remote added.", "Failed to add remote."),
            )
            .reload_on_success(ReloadKind::Remotes),
        )])
    });
    (options, callbacks)
}

// ── Help ────────────────────────────────────────────────────────────

pub fn help(topic: HelpTopic) -> Opening {
    let options = match topic {
        HelpTopic::Devices => DialogOptions::new("Help", "help device")
            .items([
                "Nederlands",
                "Stap 1: Devices → (+)",
                "Maak een nieuw screen aan.",
                "Stap 2: Open het wieltje (Edit)",
                "Ga naar de instellingen van dat screen.",
                "Stap 3: Zet de fysieke remote in pair mode",
                "Het screen gaat kort op en neer.",
                "Stap 4: In Edit → Pair",
                "Klik Pair in de webpagina. Het screen gaat opnieuw op en neer.",
                "Stap 5: → Gekoppeld.",
            ])
            .content([
                "English",
                "Step 1: Devices → (+)",
                "Create a new screen.",
                "Step 2: Open the gear (Edit)",
                "Go to that screen's settings.",
                "Step 3: Put the physical remote in pairing mode",
                "The screen will briefly move up and down.",
                "Step 4: In Edit → Pair",
                "Click Pair in the panel. The screen will move up and down again.",
                "Step 5: → Paired.",
            ]),
        HelpTopic::Remotes => DialogOptions::new("Help", "help remote")
            .items([
                "Nederlands",
                "Stap 1: Remotes → (+)",
                "Maak een nieuwe remote aan.",
                "Stap 2: Controleer ID",
                "De ID moet overeenkomen met die van de fysieke remote.",
                "(Is standaard ingevuld op basis van het laatste command.)",
                "Stap 3: Klik op Edit (pop-up)",
                "Link hier de eerder aangemaakte screen aan deze remote.",
                "Stap 4: → Klaar.",
            ])
            .content([
                "English",
                "Step 1: Remotes → (+)",
                "Create a new remote.",
                "Step 2: Check the ID",
                "The ID must match that of the physical remote.",
                "(It is pre-filled based on the last command.)",
                "Step 3: Click Edit (pop-up)",
                "Link the previously created screen to this remote here.",
                "Step 4: → Done.",
            ]),
    };
    (options, DialogCallbacks::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{Button, DialogController, DialogEvent};
    use crate::view::SelectOption;

    fn lounge() -> Device {
        Device {
            id: DeviceId::from("d1"),
            name: "Lounge".into(),
            position: 40,
            travel_time: 20,
            paired: true,
            active: true,
            description: None,
        }
    }

    fn open(ctl: &mut DialogController<Effect>, (options, callbacks): Opening) -> SessionId {
        let picker = vec![SelectOption {
            value: DeviceId::from("d1"),
            label: "Lounge".into(),
        }];
        ctl.open(options, callbacks, picker)
    }

    fn press(ctl: &mut DialogController<Effect>, button: Button) -> Vec<Effect> {
        ctl.handle(DialogEvent::Press(button)).effects
    }

    #[test]
    fn edit_device_save_sends_changed_fields_then_reloads() {
        let mut ctl = DialogController::new();
        open(&mut ctl, edit_device(&lounge()));
        ctl.handle(DialogEvent::SetText("Study".into()));
        ctl.handle(DialogEvent::SetTiming("25".into()));
        let effects = press(&mut ctl, Button::Save);

        let [Effect::Commands { steps, then_reload }] = effects.as_slice() else {
            panic!("expected one command sequence, got {effects:?}");
        };
        let commands: Vec<String> = steps.iter().map(|s| s.command.to_string()).collect();
        assert_eq!(commands, ["edit1W Study", "time1W 25"]);
        assert!(
            steps
                .iter()
                .all(|s| s.target == CommandTarget::Device(DeviceId::from("d1")))
        );
        assert_eq!(*then_reload, Some(ReloadKind::Devices));
    }

    #[test]
    fn edit_device_unchanged_save_only_reloads() {
        let mut ctl = DialogController::new();
        open(&mut ctl, edit_device(&lounge()));
        ctl.handle(DialogEvent::SetTiming("abc".into()));
        let effects = press(&mut ctl, Button::Save);
        assert_eq!(
            effects,
            [Effect::Commands {
                steps: Vec::new(),
                then_reload: Some(ReloadKind::Devices),
            }]
        );
    }

    #[test]
    fn edit_device_pairing_targets_device() {
        let mut ctl = DialogController::new();
        open(&mut ctl, edit_device(&lounge()));
        let effects = press(&mut ctl, Button::Unpair);
        let [Effect::Commands { steps, .. }] = effects.as_slice() else {
            panic!("expected commands");
        };
        assert_eq!(steps[0].command, Command::Unpair);
        assert_eq!(steps[0].target, CommandTarget::Device(DeviceId::from("d1")));
    }

    #[test]
    fn edit_device_delete_carries_session() {
        let mut ctl = DialogController::new();
        let id = open(&mut ctl, edit_device(&lounge()));
        press(&mut ctl, Button::Delete);
        let effects = press(&mut ctl, Button::Confirm);
        let [Effect::Delete { session, step, .. }] = effects.as_slice() else {
            panic!("expected delete");
        };
        assert_eq!(*session, id);
        assert_eq!(step.command.to_string(), "del1W");
        assert_eq!(
            ctl.current().unwrap().options().delete_warning(),
            DEVICE_DELETE_INFO
        );
    }

    #[test]
    fn edit_remote_link_uses_picked_device() {
        let mut ctl = DialogController::new();
        let remote = Remote {
            id: RemoteId::from("0A1B2C"),
            name: "Hall".into(),
            devices: Vec::new(),
        };
        open(&mut ctl, edit_remote(&remote));
        let effects = press(&mut ctl, Button::Pair);
        let [Effect::Commands { steps, then_reload }] = effects.as_slice() else {
            panic!("expected commands");
        };
        assert_eq!(steps[0].command.to_string(), "linkRemote 0A1B2C d1");
        assert_eq!(steps[0].target, CommandTarget::None);
        assert_eq!(*then_reload, Some(ReloadKind::Remotes));
    }

    #[test]
    fn edit_remote_rename_targets_remote() {
        let mut ctl = DialogController::new();
        let remote = Remote {
            id: RemoteId::from("0A1B2C"),
            name: "Hall".into(),
            devices: Vec::new(),
        };
        open(&mut ctl, edit_remote(&remote));
        ctl.handle(DialogEvent::SetText("Porch".into()));
        let effects = press(&mut ctl, Button::Save);
        let [Effect::Commands { steps, .. }] = effects.as_slice() else {
            panic!("expected commands");
        };
        assert_eq!(steps[0].target, CommandTarget::Remote(RemoteId::from("0A1B2C")));
        assert_eq!(steps[0].command.to_string(), "editRemote Porch");
    }

    #[test]
    fn add_remote_validates_before_any_effect() {
        let mut ctl = DialogController::new();
        open(&mut ctl, add_remote(""));
        let reply = ctl.handle(DialogEvent::Press(Button::Save));
        assert!(reply.effects.is_empty());
        assert_eq!(reply.rejected.as_deref(), Some("Please provide a remote ID."));
        assert!(ctl.is_open());

        ctl.handle(DialogEvent::SetText("0A1B2C".into()));
        let reply = ctl.handle(DialogEvent::Press(Button::Save));
        assert_eq!(reply.rejected.as_deref(), Some("Please provide a remote name."));

        ctl.handle(DialogEvent::SetTiming("Hall".into()));
        let reply = ctl.handle(DialogEvent::Press(Button::Save));
        assert!(reply.closed);
        let [Effect::Commands { steps, .. }] = reply.effects.as_slice() else {
            panic!("expected commands");
        };
        assert_eq!(steps[0].command.to_string(), "newRemote 0A1B2C Hall");
    }

    #[test]
    fn add_remote_prefills_last_address() {
        let (options, _) = add_remote(" 0A1B2C ");
        assert_eq!(options.default_value, "0A1B2C");
        assert_eq!(options.timing_caption(), "Remote Name:");
        assert!(!options.numeric_timing);
        assert!(edit_device(&lounge()).0.numeric_timing);
    }

    #[test]
    fn help_has_no_save() {
        let mut ctl = DialogController::new();
        open(&mut ctl, help(HelpTopic::Remotes));
        assert!(!ctl.current().unwrap().controls().save);
        assert!(press(&mut ctl, Button::Save).is_empty());
        assert!(ctl.is_open());
    }
}
