// ── Controller command grammar ──
//
// Typed forms of the free-text commands accepted by `POST /api/command`.
// `Display` renders the exact text the controller parses; nothing else in
// the workspace builds command strings by hand.

use std::fmt;

use crate::model::{DeviceId, RemoteId};

/// Who a command is addressed to in the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// Sent as `deviceId`.
    Device(DeviceId),
    /// Sent as `RemoteId`.
    Remote(RemoteId),
    /// Neither field set; the command names its subjects inline.
    None,
}

/// A command the panel knows how to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `edit1W <name>`: rename the targeted device.
    RenameDevice { name: String },
    /// `time1W <seconds>`: set the targeted device's travel time.
    SetTravelTime { seconds: u32 },
    /// `del1W`: delete the targeted device.
    DeleteDevice,
    /// `new1W <name>`: create a device.
    NewDevice { name: String },
    /// `add`: pair the targeted device with its physical counterpart.
    Pair,
    /// `remove`: unpair the targeted device.
    Unpair,
    /// `editRemote <name>`: rename the targeted remote.
    RenameRemote { name: String },
    /// `delRemote <id>`
    DeleteRemote { remote: RemoteId },
    /// `newRemote <id> <name>`
    NewRemote { remote: RemoteId, name: String },
    /// `linkRemote <remote> <device>`
    LinkRemote { remote: RemoteId, device: DeviceId },
    /// `unlinkRemote <remote> <device>`
    UnlinkRemote { remote: RemoteId, device: DeviceId },
    /// Operator-typed text from the console, passed through verbatim.
    Raw(String),
}

impl Command {
    /// Fields the controller requires to be non-empty, by name.
    pub fn missing_field(&self) -> Option<&'static str> {
        let blank = |s: &str| s.trim().is_empty();
        match self {
            Self::RenameDevice { name }
            | Self::NewDevice { name }
            | Self::RenameRemote { name } => blank(name).then_some("name"),
            Self::SetTravelTime { seconds } => (*seconds == 0).then_some("seconds"),
            Self::DeleteRemote { remote } => remote.is_empty().then_some("remote id"),
            Self::NewRemote { remote, name } => {
                if remote.is_empty() {
                    Some("remote id")
                } else {
                    blank(name).then_some("name")
                }
            }
            Self::LinkRemote { remote, device } | Self::UnlinkRemote { remote, device } => {
                if remote.is_empty() {
                    Some("remote id")
                } else {
                    device.is_empty().then_some("device id")
                }
            }
            Self::Raw(text) => blank(text).then_some("command"),
            Self::DeleteDevice | Self::Pair | Self::Unpair => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameDevice { name } => write!(f, "edit1W {name}"),
            Self::SetTravelTime { seconds } => write!(f, "time1W {seconds}"),
            Self::DeleteDevice => f.write_str("del1W"),
            Self::NewDevice { name } => write!(f, "new1W {name}"),
            Self::Pair => f.write_str("add"),
            Self::Unpair => f.write_str("remove"),
            Self::RenameRemote { name } => write!(f, "editRemote {name}"),
            Self::DeleteRemote { remote } => write!(f, "delRemote {remote}"),
            Self::NewRemote { remote, name } => write!(f, "newRemote {remote} {name}"),
            Self::LinkRemote { remote, device } => write!(f, "linkRemote {remote} {device}"),
            Self::UnlinkRemote { remote, device } => write!(f, "unlinkRemote {remote} {device}"),
            Self::Raw(text) => f.write_str(text.trim()),
        }
    }
}
