// ── Device/remote registry ──
//
// The panel's single in-process copy of controller state. Lists are
// replaced wholesale by fetches; device positions are patched in place
// by push events. All mutation happens on the main loop, so there are no
// locks here: the `Panel` reducer owns the one `Registry`.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use strum::Display;
use tracing::{debug, trace};

use crate::model::{Device, DeviceId, Remote, RemoteId, clamp_percent};

// ── Reload tickets ──────────────────────────────────────────────────

/// Which mapping a reload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReloadKind {
    Devices,
    Remotes,
}

/// Proof that a reload was requested, carried through the fetch and back.
///
/// Tickets are ordered per kind. A result whose ticket is older than the
/// newest applied one is discarded, so the newest *issued* request wins
/// regardless of the order responses resolve in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    kind: ReloadKind,
    seq: u64,
}

impl ReloadTicket {
    pub fn kind(self) -> ReloadKind {
        self.kind
    }
}

/// Result of handing a fetched list to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The list replaced the previous mapping.
    Applied { count: usize },
    /// A newer reload already landed; the list was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct ReloadGate {
    issued: u64,
    applied: u64,
    in_flight: BTreeSet<u64>,
    loaded_once: bool,
}

impl ReloadGate {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight.insert(self.issued);
        self.issued
    }

    /// Returns `true` if `seq` is newer than anything applied so far.
    fn land(&mut self, seq: u64) -> bool {
        self.in_flight.remove(&seq);
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        self.loaded_once = true;
        // Anything older than what just landed can no longer apply.
        self.in_flight.retain(|s| *s > seq);
        true
    }

    fn abandon(&mut self, seq: u64) {
        self.in_flight.remove(&seq);
    }

    fn busy(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

/// A position patch seen while a device reload was outstanding.
#[derive(Debug, Clone)]
struct HeldPatch {
    /// Newest device ticket issued when the patch arrived.
    after_seq: u64,
    id: DeviceId,
    position: u8,
}

// ── Registry ────────────────────────────────────────────────────────

/// In-memory devices and remotes, in controller order.
#[derive(Debug, Default)]
pub struct Registry {
    devices: IndexMap<DeviceId, Device>,
    remotes: IndexMap<RemoteId, Remote>,
    last_address: String,
    device_gate: ReloadGate,
    remote_gate: ReloadGate,
    held_patches: Vec<HeldPatch>,
    revision: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every mutation. Views redraw when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn devices(&self) -> impl ExactSizeIterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Resolve a remote's device reference by id, then name, then description.
    pub fn resolve_link(&self, key: &str) -> Option<&Device> {
        self.devices.get(&DeviceId::from(key)).or_else(|| {
            self.devices
                .values()
                .find(|d| d.name == key || d.description.as_deref() == Some(key))
        })
    }

    pub fn remotes(&self) -> impl ExactSizeIterator<Item = &Remote> {
        self.remotes.values()
    }

    pub fn remote(&self, id: &RemoteId) -> Option<&Remote> {
        self.remotes.get(id)
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    /// Last remote address heard by the radio, or `""`.
    pub fn last_address(&self) -> &str {
        &self.last_address
    }

    /// `true` while a reload of `kind` has been requested but not landed.
    pub fn is_loading(&self, kind: ReloadKind) -> bool {
        self.gate(kind).busy()
    }

    /// `true` once any reload of `kind` has been applied.
    pub fn has_loaded(&self, kind: ReloadKind) -> bool {
        self.gate(kind).loaded_once
    }

    fn gate(&self, kind: ReloadKind) -> &ReloadGate {
        match kind {
            ReloadKind::Devices => &self.device_gate,
            ReloadKind::Remotes => &self.remote_gate,
        }
    }

    // ── Reloads ──────────────────────────────────────────────────────

    /// Register a new reload. The ticket must come back with the result.
    pub fn begin_reload(&mut self, kind: ReloadKind) -> ReloadTicket {
        let seq = match kind {
            ReloadKind::Devices => self.device_gate.issue(),
            ReloadKind::Remotes => self.remote_gate.issue(),
        };
        trace!(%kind, seq, "reload issued");
        ReloadTicket { kind, seq }
    }

    /// Replace the device mapping with a fetched list.
    ///
    /// The swap is a single assignment, so no reader ever sees a mix of old
    /// and new devices. Patches that arrived after the ticket was issued are
    /// replayed on top, since a push is newer than the snapshot request.
    pub fn finish_device_reload(
        &mut self,
        ticket: ReloadTicket,
        devices: Vec<Device>,
    ) -> ReloadOutcome {
        debug_assert_eq!(ticket.kind, ReloadKind::Devices);
        if !self.device_gate.land(ticket.seq) {
            debug!(seq = ticket.seq, "dropping stale device list");
            return ReloadOutcome::Stale;
        }

        let mut fresh: IndexMap<DeviceId, Device> =
            devices.into_iter().map(|d| (d.id.clone(), d)).collect();

        for patch in self.held_patches.iter().filter(|p| p.after_seq >= ticket.seq) {
            if let Some(dev) = fresh.get_mut(&patch.id) {
                trace!(id = %patch.id, position = patch.position, "replaying held patch");
                dev.position = patch.position;
            }
        }
        if self.device_gate.busy() {
            self.held_patches.retain(|p| p.after_seq > ticket.seq);
        } else {
            self.held_patches.clear();
        }

        let count = fresh.len();
        self.devices = fresh;
        self.touch();
        ReloadOutcome::Applied { count }
    }

    /// Replace the remote mapping with a fetched list.
    pub fn finish_remote_reload(
        &mut self,
        ticket: ReloadTicket,
        remotes: Vec<Remote>,
    ) -> ReloadOutcome {
        debug_assert_eq!(ticket.kind, ReloadKind::Remotes);
        if !self.remote_gate.land(ticket.seq) {
            debug!(seq = ticket.seq, "dropping stale remote list");
            return ReloadOutcome::Stale;
        }
        let fresh: IndexMap<RemoteId, Remote> =
            remotes.into_iter().map(|r| (r.id.clone(), r)).collect();
        let count = fresh.len();
        self.remotes = fresh;
        self.touch();
        ReloadOutcome::Applied { count }
    }

    /// Forget a failed reload. The previous mapping stays as it was.
    pub fn abandon_reload(&mut self, ticket: ReloadTicket) {
        match ticket.kind {
            ReloadKind::Devices => {
                self.device_gate.abandon(ticket.seq);
                if !self.device_gate.busy() {
                    self.held_patches.clear();
                }
            }
            ReloadKind::Remotes => self.remote_gate.abandon(ticket.seq),
        }
    }

    // ── Patches ──────────────────────────────────────────────────────

    /// Set one device's position. Unknown ids are a no-op (returns `false`)
    /// and are never queued for a later fetch.
    pub fn apply_position_patch(&mut self, id: &DeviceId, percent: i64) -> bool {
        let position = clamp_percent(percent);
        let Some(device) = self.devices.get_mut(id) else {
            trace!(%id, "position patch for unknown device ignored");
            return false;
        };
        device.position = position;

        if self.device_gate.busy() {
            self.held_patches.push(HeldPatch {
                after_seq: self.device_gate.issued,
                id: id.clone(),
                position,
            });
        }
        self.touch();
        true
    }

    /// Record the last-heard remote address. Returns `true` if it changed.
    pub fn set_last_address(&mut self, address: impl Into<String>) -> bool {
        let address = address.into();
        if address == self.last_address {
            return false;
        }
        self.last_address = address;
        self.touch();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(id: &str, name: &str, position: u8) -> Device {
        Device {
            id: DeviceId::from(id),
            name: name.into(),
            position,
            travel_time: 20,
            paired: true,
            active: true,
            description: None,
        }
    }

    fn positions(reg: &Registry) -> Vec<(String, u8)> {
        reg.devices()
            .map(|d| (d.id.to_string(), d.position))
            .collect()
    }

    #[test]
    fn reload_replaces_whole_mapping() {
        let mut reg = Registry::new();
        let t1 = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t1, vec![dev("d1", "Lounge", 40), dev("d2", "Hall", 0)]);

        let t2 = reg.begin_reload(ReloadKind::Devices);
        let outcome = reg.finish_device_reload(t2, vec![dev("d3", "Attic", 10)]);

        assert_eq!(outcome, ReloadOutcome::Applied { count: 1 });
        assert_eq!(positions(&reg), vec![("d3".to_string(), 10)]);
        assert!(reg.device(&DeviceId::from("d1")).is_none());
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut reg = Registry::new();
        let old = reg.begin_reload(ReloadKind::Devices);
        let new = reg.begin_reload(ReloadKind::Devices);

        reg.finish_device_reload(new, vec![dev("d1", "Lounge", 60)]);
        let outcome = reg.finish_device_reload(old, vec![dev("d1", "Lounge", 5)]);

        assert_eq!(outcome, ReloadOutcome::Stale);
        assert_eq!(positions(&reg), vec![("d1".to_string(), 60)]);
        assert!(!reg.is_loading(ReloadKind::Devices));
    }

    #[test]
    fn older_result_landing_first_is_still_applied() {
        let mut reg = Registry::new();
        let old = reg.begin_reload(ReloadKind::Devices);
        let new = reg.begin_reload(ReloadKind::Devices);

        assert!(matches!(
            reg.finish_device_reload(old, vec![dev("d1", "Lounge", 5)]),
            ReloadOutcome::Applied { .. }
        ));
        assert!(reg.is_loading(ReloadKind::Devices));
        reg.finish_device_reload(new, vec![dev("d1", "Lounge", 60)]);
        assert_eq!(positions(&reg), vec![("d1".to_string(), 60)]);
    }

    #[test]
    fn patch_for_unknown_device_is_not_queued() {
        let mut reg = Registry::new();
        let ticket = reg.begin_reload(ReloadKind::Devices);

        assert!(!reg.apply_position_patch(&DeviceId::from("d1"), 75));
        reg.finish_device_reload(ticket, vec![dev("d1", "Lounge", 40)]);

        assert_eq!(positions(&reg), vec![("d1".to_string(), 40)]);
    }

    #[test]
    fn patch_during_reload_survives_reload() {
        let mut reg = Registry::new();
        let t1 = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t1, vec![dev("d1", "Lounge", 40)]);

        let t2 = reg.begin_reload(ReloadKind::Devices);
        assert!(reg.apply_position_patch(&DeviceId::from("d1"), 75));
        reg.finish_device_reload(t2, vec![dev("d1", "Lounge", 40), dev("d2", "Hall", 0)]);

        assert_eq!(
            positions(&reg),
            vec![("d1".to_string(), 75), ("d2".to_string(), 0)]
        );
    }

    #[test]
    fn patch_outside_reload_is_not_held() {
        let mut reg = Registry::new();
        let t1 = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t1, vec![dev("d1", "Lounge", 40)]);
        reg.apply_position_patch(&DeviceId::from("d1"), 75);

        let t2 = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t2, vec![dev("d1", "Lounge", 30)]);

        assert_eq!(positions(&reg), vec![("d1".to_string(), 30)]);
    }

    #[test]
    fn patch_clamps_and_bumps_revision() {
        let mut reg = Registry::new();
        let t = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t, vec![dev("d1", "Lounge", 40)]);
        let before = reg.revision();

        reg.apply_position_patch(&DeviceId::from("d1"), 180);

        assert_eq!(reg.device(&DeviceId::from("d1")).unwrap().position, 100);
        assert!(reg.revision() > before);
    }

    #[test]
    fn abandoned_reload_keeps_previous_mapping() {
        let mut reg = Registry::new();
        let t1 = reg.begin_reload(ReloadKind::Devices);
        reg.finish_device_reload(t1, vec![dev("d1", "Lounge", 40)]);

        let t2 = reg.begin_reload(ReloadKind::Devices);
        reg.abandon_reload(t2);

        assert_eq!(reg.device_count(), 1);
        assert!(!reg.is_loading(ReloadKind::Devices));
    }

    #[test]
    fn resolve_link_by_id_name_or_description() {
        let mut reg = Registry::new();
        let t = reg.begin_reload(ReloadKind::Devices);
        let mut attic = dev("d3", "Attic", 0);
        attic.description = Some("roof window".into());
        reg.finish_device_reload(t, vec![dev("d1", "Lounge", 0), attic]);

        assert_eq!(reg.resolve_link("d1").unwrap().name, "Lounge");
        assert_eq!(reg.resolve_link("Attic").unwrap().id.as_str(), "d3");
        assert_eq!(reg.resolve_link("roof window").unwrap().id.as_str(), "d3");
        assert!(reg.resolve_link("garage").is_none());
    }

    #[test]
    fn remotes_reload_independently() {
        let mut reg = Registry::new();
        let t = reg.begin_reload(ReloadKind::Remotes);
        assert!(reg.is_loading(ReloadKind::Remotes));
        assert!(!reg.is_loading(ReloadKind::Devices));

        reg.finish_remote_reload(
            t,
            vec![Remote {
                id: RemoteId::from("0A1B2C"),
                name: "Hall".into(),
                devices: Vec::new(),
            }],
        );
        assert_eq!(reg.remote_count(), 1);
        assert!(reg.has_loaded(ReloadKind::Remotes));
        assert!(!reg.has_loaded(ReloadKind::Devices));
    }

    #[test]
    fn last_address_change_detection() {
        let mut reg = Registry::new();
        assert!(reg.set_last_address("0A1B2C"));
        assert!(!reg.set_last_address("0A1B2C"));
        assert_eq!(reg.last_address(), "0A1B2C");
    }
}
