// ── View models ──
//
// Registry contents shaped for rendering: device rows with their fill
// split, select options, and remote rows with linked devices resolved to
// names. Renderers never read the registry directly.

use crate::fill::FillSplit;
use crate::model::{DeviceId, RemoteId};
use crate::registry::Registry;

pub const NO_DEVICES: &str = "No devices available.";
pub const NO_REMOTES: &str = "No remotes available.";
/// Shown in the linked column of a remote with no devices.
pub const NO_LINKED_DEVICES: &str = "0 devices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: DeviceId,
    pub name: String,
    pub fill: FillSplit,
    pub paired: bool,
    pub active: bool,
    pub travel_time: u32,
}

/// One entry of a device select: value is the id, label the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: DeviceId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRow {
    pub id: RemoteId,
    pub name: String,
    /// Names of linked devices, or the raw reference when it resolves to
    /// nothing in the registry.
    pub linked: Vec<String>,
}

impl RemoteRow {
    /// Linked devices as one comma-separated cell.
    pub fn linked_label(&self) -> String {
        if self.linked.is_empty() {
            NO_LINKED_DEVICES.to_owned()
        } else {
            self.linked.join(", ")
        }
    }
}

pub fn device_rows(registry: &Registry) -> Vec<DeviceRow> {
    registry
        .devices()
        .map(|d| DeviceRow {
            id: d.id.clone(),
            name: d.name.clone(),
            fill: FillSplit::new(i64::from(d.position)),
            paired: d.paired,
            active: d.active,
            travel_time: d.travel_time,
        })
        .collect()
}

pub fn device_options(registry: &Registry) -> Vec<SelectOption> {
    registry
        .devices()
        .map(|d| SelectOption {
            value: d.id.clone(),
            label: d.name.clone(),
        })
        .collect()
}

pub fn remote_rows(registry: &Registry) -> Vec<RemoteRow> {
    registry
        .remotes()
        .map(|r| RemoteRow {
            id: r.id.clone(),
            name: r.name.clone(),
            linked: r
                .devices
                .iter()
                .map(|link| {
                    registry.resolve_link(&link.key).map_or_else(
                        || link.name_hint.clone().unwrap_or_else(|| link.key.clone()),
                        |d| d.name.clone(),
                    )
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Device, DeviceLink, Remote};
    use crate::registry::ReloadKind;

    fn loaded() -> Registry {
        let mut reg = Registry::new();
        let t = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(
            t,
            vec![Device {
                id: DeviceId::from("d1"),
                name: "Lounge".into(),
                position: 40,
                travel_time: 20,
                paired: true,
                active: true,
                description: Some("south window".into()),
            }],
        );
        let t = reg.begin_reload(ReloadKind::Remotes);
        reg.finish_remote_reload(
            t,
            vec![
                Remote {
                    id: RemoteId::from("0A1B2C"),
                    name: "Hall".into(),
                    devices: vec![
                        DeviceLink {
                            key: "d1".into(),
                            name_hint: None,
                        },
                        DeviceLink {
                            key: "south window".into(),
                            name_hint: None,
                        },
                        DeviceLink {
                            key: "ghost".into(),
                            name_hint: None,
                        },
                    ],
                },
                Remote {
                    id: RemoteId::from("FF0011"),
                    name: "Spare".into(),
                    devices: Vec::new(),
                },
            ],
        );
        reg
    }

    #[test]
    fn device_rows_and_options() {
        let reg = loaded();
        assert_eq!(
            device_rows(&reg),
            vec![DeviceRow {
                id: DeviceId::from("d1"),
                name: "Lounge".into(),
                fill: FillSplit::new(40),
                paired: true,
                active: true,
                travel_time: 20,
            }]
        );
        assert_eq!(
            device_options(&reg),
            vec![SelectOption {
                value: DeviceId::from("d1"),
                label: "Lounge".into(),
            }]
        );
    }

    #[test]
    fn remote_links_resolve_by_id_description_or_raw() {
        let rows = remote_rows(&loaded());
        assert_eq!(rows[0].linked, ["Lounge", "Lounge", "ghost"]);
        assert_eq!(rows[0].linked_label(), "Lounge, Lounge, ghost");
        assert_eq!(rows[1].linked_label(), "0 devices");
    }
}
