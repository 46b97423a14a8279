// ── Domain model ──
//
// Devices and remotes as the panel sees them. Wire records from
// `coverly-api` are normalized here: ids become typed newtypes and
// positions are clamped into 0..=100.

use std::fmt;

use coverly_api::{DeviceRecord, RemoteDeviceRef, RemoteRecord};
use serde::{Deserialize, Serialize};

// ── Identity types ──────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Server-assigned device identity. Immutable once assigned.
    DeviceId
);

string_id!(
    /// Remote identity: the physical remote's radio address.
    RemoteId
);

// ── Position ────────────────────────────────────────────────────────

/// Clamp any reported percentage into `0..=100`.
pub fn clamp_percent(value: i64) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

// ── Device ──────────────────────────────────────────────────────────

/// A motorized cover unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Percent open, always within `0..=100` (0 = closed).
    pub position: u8,
    /// Seconds for a full traversal. 0 when the controller has none on record.
    pub travel_time: u32,
    pub paired: bool,
    pub active: bool,
    pub description: Option<String>,
}

impl From<DeviceRecord> for Device {
    fn from(rec: DeviceRecord) -> Self {
        Self {
            id: DeviceId::from(rec.id),
            name: rec.name,
            position: clamp_percent(rec.position),
            travel_time: u32::try_from(rec.travel_time.max(0)).unwrap_or(u32::MAX),
            paired: rec.paired,
            active: rec.active,
            description: rec.description.filter(|d| !d.is_empty()),
        }
    }
}

// ── Remote ──────────────────────────────────────────────────────────

/// A remote's reference to a device it controls.
///
/// The controller lists either ids or display names, so a link is
/// resolved against the registry at render time rather than on ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLink {
    pub key: String,
    pub name_hint: Option<String>,
}

impl From<RemoteDeviceRef> for DeviceLink {
    fn from(r: RemoteDeviceRef) -> Self {
        match r {
            RemoteDeviceRef::Bare(key) => Self {
                key,
                name_hint: None,
            },
            RemoteDeviceRef::Linked { id, name } => Self {
                key: id,
                name_hint: name,
            },
        }
    }
}

/// A physical remote. Links reference devices; they do not own them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub id: RemoteId,
    pub name: String,
    pub devices: Vec<DeviceLink>,
}

impl From<RemoteRecord> for Remote {
    fn from(rec: RemoteRecord) -> Self {
        let mut devices: Vec<DeviceLink> = Vec::with_capacity(rec.devices.len());
        for link in rec.devices.into_iter().map(DeviceLink::from) {
            // Ordered set: keep the first occurrence only.
            if !devices.iter().any(|d| d.key == link.key) {
                devices.push(link);
            }
        }
        Self {
            id: RemoteId::from(rec.id),
            name: rec.name,
            devices,
        }
    }
}
