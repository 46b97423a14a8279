//! The shared configurable dialog.
//!
//! One [`DialogController`] serves every call site. Each opening supplies a
//! [`DialogOptions`] (what is visible) and [`DialogCallbacks`] (what the
//! buttons do). The controller runs the two-state machine in [`machine`]
//! and returns whatever effects the callbacks produced.

pub mod machine;
pub mod options;
pub mod session;

use tracing::{debug, trace};

pub use machine::{Button, Capabilities, Controls, Mode};
pub use options::DialogOptions;
pub use session::{DialogCallbacks, DialogSession, SaveValues, SessionId};

use machine::{Input, Invoke, Step, transition};

use crate::view::SelectOption;

/// Operator input routed to the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    SetText(String),
    SetTiming(String),
    SetBoolean(bool),
    ToggleBoolean,
    /// Choose a picker entry by index.
    SelectDevice(usize),
    /// Move the picker selection by `delta`, clamped to the list.
    MoveSelection(isize),
    Press(Button),
}

/// What handling one event produced.
#[derive(Debug)]
pub struct DialogReply<E> {
    /// Effects returned by whichever callback ran.
    pub effects: Vec<E>,
    /// `on_save` refused the values; the dialog stays open.
    pub rejected: Option<String>,
    /// The session ended with this event.
    pub closed: bool,
}

impl<E> Default for DialogReply<E> {
    fn default() -> Self {
        Self {
            effects: Vec::new(),
            rejected: None,
            closed: false,
        }
    }
}

impl<E> DialogReply<E> {
    fn closed(effects: Vec<E>) -> Self {
        Self {
            effects,
            rejected: None,
            closed: true,
        }
    }
}

/// Owner of the single open session.
#[derive(Debug)]
pub struct DialogController<E> {
    session: Option<DialogSession<E>>,
    next_id: u64,
}

impl<E> Default for DialogController<E> {
    fn default() -> Self {
        Self {
            session: None,
            next_id: 1,
        }
    }
}

impl<E> DialogController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog, discarding any session that was still open.
    pub fn open(
        &mut self,
        options: DialogOptions,
        callbacks: DialogCallbacks<E>,
        picker: Vec<SelectOption>,
    ) -> SessionId {
        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        if let Some(previous) = self.session.take() {
            debug!(previous = %previous.id(), "replacing open dialog");
        }
        debug!(session = %id, title = %options.title, "dialog opened");
        self.session = Some(DialogSession::open(id, options, callbacks, picker));
        id
    }

    pub fn current(&self) -> Option<&DialogSession<E>> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Close without running any callback.
    pub fn dismiss(&mut self) {
        self.session = None;
    }

    /// Route one operator event to the open session.
    pub fn handle(&mut self, event: DialogEvent) -> DialogReply<E> {
        let Some(session) = self.session.as_mut() else {
            return DialogReply::default();
        };

        let button = match event {
            DialogEvent::Press(button) => button,
            edit => {
                if session.editable() {
                    apply_edit(session, edit);
                }
                return DialogReply::default();
            }
        };

        let step = transition(session.caps, session.mode, Input::Press(button));
        trace!(session = %session.id, ?button, ?step, "dialog step");
        match step {
            Step::Ignored => DialogReply::default(),
            Step::Goto(mode) => {
                session.mode = mode;
                DialogReply::default()
            }
            Step::InvokeThen(Invoke::Delete, mode) => {
                let effects = session
                    .callbacks
                    .on_delete
                    .as_ref()
                    .map(|f| f(session.id))
                    .unwrap_or_default();
                session.mode = mode;
                DialogReply {
                    effects,
                    ..DialogReply::default()
                }
            }
            Step::InvokeThen(..) => DialogReply::default(),
            Step::Close(None) => {
                self.session = None;
                DialogReply::closed(Vec::new())
            }
            Step::Close(Some(Invoke::Save)) => {
                let values = session.values();
                let result = session
                    .callbacks
                    .on_save
                    .as_ref()
                    .map_or_else(|| Ok(Vec::new()), |f| f(&values));
                match result {
                    Ok(effects) => {
                        self.session = None;
                        DialogReply::closed(effects)
                    }
                    Err(message) => DialogReply {
                        rejected: Some(message),
                        ..DialogReply::default()
                    },
                }
            }
            Step::Close(Some(invoke)) => {
                let Some(session) = self.session.take() else {
                    return DialogReply::default();
                };
                let device = session
                    .caps
                    .picker
                    .then(|| session.selected_device().cloned())
                    .flatten();
                let callback = match invoke {
                    Invoke::Pair => session.callbacks.on_pair.as_ref(),
                    Invoke::Unpair => session.callbacks.on_unpair.as_ref(),
                    Invoke::Save | Invoke::Delete => None,
                };
                DialogReply::closed(callback.map(|f| f(device)).unwrap_or_default())
            }
        }
    }

    /// Report the outcome of the delete started by session `id`.
    ///
    /// Returns `true` if the session closed. Outcomes for a session that
    /// is no longer open, or not awaiting, are dropped.
    pub fn delete_finished(&mut self, id: SessionId, succeeded: bool) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            debug!(session = %id, "delete outcome for closed dialog dropped");
            return false;
        };
        let input = if succeeded {
            Input::DeleteSucceeded
        } else {
            Input::DeleteFailed
        };
        match transition(session.caps, session.mode, input) {
            Step::Close(_) => {
                self.session = None;
                true
            }
            Step::Goto(mode) => {
                session.mode = mode;
                false
            }
            Step::Ignored | Step::InvokeThen(..) => false,
        }
    }
}

fn apply_edit<E>(session: &mut DialogSession<E>, edit: DialogEvent) {
    match edit {
        DialogEvent::SetText(text) if session.caps.input => session.text = text,
        DialogEvent::SetTiming(timing) if session.caps.timing => session.timing = timing,
        DialogEvent::SetBoolean(value) if session.caps.boolean => session.boolean = value,
        DialogEvent::ToggleBoolean if session.caps.boolean => session.boolean = !session.boolean,
        DialogEvent::SelectDevice(index) if index < session.picker.len() => {
            session.picked = index;
        }
        DialogEvent::MoveSelection(delta) if !session.picker.is_empty() => {
            let last = session.picker.len() - 1;
            session.picked = session.picked.saturating_add_signed(delta).min(last);
        }
        _ => {}
    }
}
