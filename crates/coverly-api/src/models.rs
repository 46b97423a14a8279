// Wire types for the shutter controller's JSON API.
//
// Fields use `#[serde(default)]` liberally because firmware builds differ
// in which fields they emit. Device ids arrive as strings on some builds and
// as integers on others; both are normalized to `String` here.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

// ── Id normalization ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Deserialize an id that may be a JSON string or a JSON integer.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

// ── Device ───────────────────────────────────────────────────────────

/// Device record from `GET /api/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Percent open as reported by the controller. Not range-checked here.
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub travel_time: i64,
    #[serde(default)]
    pub paired: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

// ── Remote ───────────────────────────────────────────────────────────

/// A device reference inside a remote record.
///
/// Older firmware lists bare ids or names, newer firmware lists `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteDeviceRef {
    Bare(#[serde(deserialize_with = "de_id")] String),
    Linked {
        #[serde(deserialize_with = "de_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl RemoteDeviceRef {
    /// The raw reference text: the id for linked refs, the string otherwise.
    pub fn key(&self) -> &str {
        match self {
            Self::Bare(s) => s,
            Self::Linked { id, .. } => id,
        }
    }
}

/// Remote record from `GET /api/remotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub devices: Vec<RemoteDeviceRef>,
}

// ── Command / action ─────────────────────────────────────────────────

/// Body of `POST /api/command`.
///
/// At most one of `device_id` / `remote_id` is set; remote-scoped commands
/// that name their remote inline (`delRemote <id>`) carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRequest {
    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(rename = "RemoteId", skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    pub command: String,
}

/// Reply of `POST /api/command`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Motion request understood by `POST /api/action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceAction {
    Open,
    Stop,
    Close,
}

/// Body of `POST /api/action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub action: DeviceAction,
}

/// Reply of `POST /api/action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Settings / misc ──────────────────────────────────────────────────

/// MQTT bridge settings (`GET/POST /api/mqtt`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub discovery: String,
}

/// Reply of `GET /api/lastaddr`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LastAddrReply {
    #[serde(default)]
    pub address: Option<String>,
}

/// Generic `{message}` reply of upload and settings endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// Which persisted map a download or upload addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FileKind {
    Devices,
    Remotes,
}

impl FileKind {
    /// File name the controller uses for this map.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Devices => "1W.json",
            Self::Remotes => "RemoteMap.json",
        }
    }

    pub(crate) fn path_segment(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Remotes => "remotes",
        }
    }
}
