// ── Dialog session ──
//
// The live state of one open dialog: field values, the picker snapshot,
// injected callbacks, and the machine mode. Callbacks return effects of
// type `E` instead of performing I/O, so the controller stays synchronous.

use std::fmt;

use super::machine::{Capabilities, Mode, controls, Controls};
use super::options::DialogOptions;
use crate::model::DeviceId;
use crate::view::SelectOption;

/// Identity of one open session. Late delete outcomes carry it back so a
/// result for a session that is already gone is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Field values handed to `on_save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveValues {
    /// Free-text value; empty when the input region is hidden.
    pub text: String,
    /// Numeric field as typed; `None` when hidden.
    pub timing: Option<String>,
    /// Toggle value; `None` when hidden.
    pub boolean: Option<bool>,
    /// Picker selection; `None` when hidden or empty.
    pub device: Option<DeviceId>,
}

pub type SaveFn<E> = Box<dyn Fn(&SaveValues) -> Result<Vec<E>, String> + Send>;
pub type PickFn<E> = Box<dyn Fn(Option<DeviceId>) -> Vec<E> + Send>;
pub type DeleteFn<E> = Box<dyn Fn(SessionId) -> Vec<E> + Send>;

/// Optional behaviors injected per call site.
pub struct DialogCallbacks<E> {
    /// `Err(message)` keeps the dialog open and reports the message.
    pub on_save: Option<SaveFn<E>>,
    pub on_pair: Option<PickFn<E>>,
    pub on_unpair: Option<PickFn<E>>,
    /// Must eventually be answered through `DialogController::delete_finished`.
    pub on_delete: Option<DeleteFn<E>>,
}

impl<E> Default for DialogCallbacks<E> {
    fn default() -> Self {
        Self {
            on_save: None,
            on_pair: None,
            on_unpair: None,
            on_delete: None,
        }
    }
}

impl<E> DialogCallbacks<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_save(
        mut self,
        f: impl Fn(&SaveValues) -> Result<Vec<E>, String> + Send + 'static,
    ) -> Self {
        self.on_save = Some(Box::new(f));
        self
    }

    pub fn on_pair(mut self, f: impl Fn(Option<DeviceId>) -> Vec<E> + Send + 'static) -> Self {
        self.on_pair = Some(Box::new(f));
        self
    }

    pub fn on_unpair(mut self, f: impl Fn(Option<DeviceId>) -> Vec<E> + Send + 'static) -> Self {
        self.on_unpair = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl Fn(SessionId) -> Vec<E> + Send + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }
}

impl<E> fmt::Debug for DialogCallbacks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogCallbacks")
            .field("on_save", &self.on_save.is_some())
            .field("on_pair", &self.on_pair.is_some())
            .field("on_unpair", &self.on_unpair.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// One open dialog.
#[derive(Debug)]
pub struct DialogSession<E> {
    pub(super) id: SessionId,
    pub(super) options: DialogOptions,
    pub(super) callbacks: DialogCallbacks<E>,
    pub(super) caps: Capabilities,
    pub(super) mode: Mode,
    pub(super) text: String,
    pub(super) timing: String,
    pub(super) boolean: bool,
    pub(super) picker: Vec<SelectOption>,
    pub(super) picked: usize,
}

impl<E> DialogSession<E> {
    pub(super) fn open(
        id: SessionId,
        options: DialogOptions,
        callbacks: DialogCallbacks<E>,
        picker: Vec<SelectOption>,
    ) -> Self {
        let caps = Capabilities::derive(
            &options,
            callbacks.on_pair.is_some(),
            callbacks.on_unpair.is_some(),
            callbacks.on_delete.is_some(),
        );
        let picker = if options.show_device_picker {
            picker
        } else {
            Vec::new()
        };
        Self {
            id,
            text: if options.show_input {
                options.default_value.clone()
            } else {
                String::new()
            },
            timing: if options.show_timing {
                options.default_timing.clone()
            } else {
                String::new()
            },
            boolean: options.show_boolean && options.default_boolean,
            options,
            callbacks,
            caps,
            mode: Mode::Normal,
            picker,
            picked: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn controls(&self) -> Controls {
        controls(self.caps, self.mode)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timing(&self) -> &str {
        &self.timing
    }

    pub fn boolean(&self) -> bool {
        self.boolean
    }

    pub fn picker(&self) -> &[SelectOption] {
        &self.picker
    }

    pub fn picked_index(&self) -> usize {
        self.picked
    }

    /// The device currently chosen in the picker.
    pub fn selected_device(&self) -> Option<&DeviceId> {
        self.picker.get(self.picked).map(|o| &o.value)
    }

    pub fn values(&self) -> SaveValues {
        SaveValues {
            text: self.text.clone(),
            timing: self.caps.timing.then(|| self.timing.clone()),
            boolean: self.caps.boolean.then_some(self.boolean),
            device: self.selected_device().cloned(),
        }
    }

    /// Field edits are refused while a delete is in flight.
    pub(super) fn editable(&self) -> bool {
        !matches!(self.mode, Mode::DeleteConfirm { awaiting: true })
    }
}
