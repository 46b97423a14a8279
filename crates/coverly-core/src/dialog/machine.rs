//! The dialog state machine.
//!
//! Two composed states: **Normal**, and **Delete-confirm** (with an
//! `awaiting` flag while the delete callback's effect is in flight). The
//! functions here are pure. They decide what an input does and which
//! controls are visible, and never touch callbacks or the network.

use super::options::DialogOptions;

/// What the session can do, fixed when it opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub input: bool,
    pub timing: bool,
    pub boolean: bool,
    pub picker: bool,
    pub save: bool,
    pub pair: bool,
    pub unpair: bool,
    pub pair_label: bool,
    pub delete: bool,
    pub cancel: bool,
}

impl Capabilities {
    /// Derive capabilities from the options and which callbacks exist.
    pub fn derive(
        options: &DialogOptions,
        has_pair: bool,
        has_unpair: bool,
        has_delete: bool,
    ) -> Self {
        Self {
            input: options.show_input,
            timing: options.show_timing,
            boolean: options.show_boolean,
            picker: options.show_device_picker,
            save: options.show_save,
            pair: has_pair,
            unpair: has_unpair,
            pair_label: options.pair_label.is_some() && (has_pair || has_unpair),
            delete: options.show_delete && has_delete,
            cancel: options.show_cancel,
        }
    }
}

/// Sub-state of an open session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    DeleteConfirm {
        /// The delete callback ran and its outcome is pending.
        awaiting: bool,
    },
}

/// Buttons the operator can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Save,
    Pair,
    Unpair,
    /// The delete entry button (normal mode).
    Delete,
    /// Confirm the delete (delete-confirm).
    Confirm,
    /// Delete-confirm: back to normal. Normal: plain dismiss, if shown.
    Cancel,
    /// Page-level close. Always available.
    Dismiss,
}

impl Button {
    pub const ALL: [Self; 7] = [
        Self::Save,
        Self::Pair,
        Self::Unpair,
        Self::Delete,
        Self::Confirm,
        Self::Cancel,
        Self::Dismiss,
    ];
}

/// Inputs to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Press(Button),
    DeleteSucceeded,
    DeleteFailed,
}

/// Callback the session should run as part of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invoke {
    Save,
    Pair,
    Unpair,
    Delete,
}

/// Result of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not available in the current state; nothing changes.
    Ignored,
    /// Move to `Mode`.
    Goto(Mode),
    /// Run the callback, then move to `Mode`.
    InvokeThen(Invoke, Mode),
    /// Close the session, running the callback first if any.
    Close(Option<Invoke>),
}

/// The transition function.
pub fn transition(caps: Capabilities, mode: Mode, input: Input) -> Step {
    match (mode, input) {
        (_, Input::Press(Button::Dismiss)) => Step::Close(None),

        // ── Normal ───────────────────────────────────────────────────
        (Mode::Normal, Input::Press(button)) => match button {
            Button::Save if caps.save => Step::Close(Some(Invoke::Save)),
            Button::Pair if caps.pair => Step::Close(Some(Invoke::Pair)),
            Button::Unpair if caps.unpair => Step::Close(Some(Invoke::Unpair)),
            Button::Delete if caps.delete => Step::Goto(Mode::DeleteConfirm { awaiting: false }),
            Button::Cancel if caps.cancel => Step::Close(None),
            _ => Step::Ignored,
        },

        // ── Delete-confirm ───────────────────────────────────────────
        (Mode::DeleteConfirm { awaiting: false }, Input::Press(button)) => match button {
            Button::Confirm => {
                Step::InvokeThen(Invoke::Delete, Mode::DeleteConfirm { awaiting: true })
            }
            Button::Cancel => Step::Goto(Mode::Normal),
            Button::Save if caps.save => Step::Close(Some(Invoke::Save)),
            _ => Step::Ignored,
        },
        (Mode::DeleteConfirm { awaiting: true }, Input::DeleteSucceeded) => Step::Close(None),
        (Mode::DeleteConfirm { awaiting: true }, Input::DeleteFailed) => {
            Step::Goto(Mode::DeleteConfirm { awaiting: false })
        }

        // Presses while awaiting, and delete results nobody is waiting for.
        _ => Step::Ignored,
    }
}

/// Which regions and buttons are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub input: bool,
    pub timing: bool,
    pub boolean: bool,
    pub picker: bool,
    pub save: bool,
    pub pair_label: bool,
    pub pair: bool,
    pub unpair: bool,
    pub delete_entry: bool,
    pub delete_info: bool,
    pub confirm: bool,
    pub cancel: bool,
    /// A delete is in flight; buttons are shown but inert.
    pub busy: bool,
}

impl Controls {
    /// Whether pressing `button` does anything in this projection.
    pub fn clickable(&self, button: Button) -> bool {
        if self.busy {
            return button == Button::Dismiss;
        }
        match button {
            Button::Save => self.save,
            Button::Pair => self.pair,
            Button::Unpair => self.unpair,
            Button::Delete => self.delete_entry,
            Button::Confirm => self.confirm,
            Button::Cancel => self.cancel,
            Button::Dismiss => true,
        }
    }
}

/// Project capabilities and mode onto visible controls.
pub fn controls(caps: Capabilities, mode: Mode) -> Controls {
    let fields = Controls {
        input: caps.input,
        timing: caps.timing,
        boolean: caps.boolean,
        picker: caps.picker,
        ..Controls::default()
    };
    match mode {
        Mode::Normal => Controls {
            save: caps.save,
            pair_label: caps.pair_label,
            pair: caps.pair,
            unpair: caps.unpair,
            delete_entry: caps.delete,
            cancel: caps.cancel,
            ..fields
        },
        Mode::DeleteConfirm { awaiting } => Controls {
            save: caps.save,
            delete_info: true,
            confirm: true,
            cancel: true,
            busy: awaiting,
            ..fields
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Capabilities {
        Capabilities {
            input: true,
            timing: true,
            boolean: true,
            picker: true,
            save: true,
            pair: true,
            unpair: true,
            pair_label: true,
            delete: true,
            cancel: false,
        }
    }

    fn all_caps() -> Vec<Capabilities> {
        // Every combination of the button-bearing capabilities.
        (0u8..32)
            .map(|bits| Capabilities {
                save: bits & 1 != 0,
                pair: bits & 2 != 0,
                unpair: bits & 4 != 0,
                delete: bits & 8 != 0,
                cancel: bits & 16 != 0,
                ..Capabilities::default()
            })
            .collect()
    }

    const MODES: [Mode; 3] = [
        Mode::Normal,
        Mode::DeleteConfirm { awaiting: false },
        Mode::DeleteConfirm { awaiting: true },
    ];

    #[test]
    fn delete_entry_enters_confirm() {
        assert_eq!(
            transition(full(), Mode::Normal, Input::Press(Button::Delete)),
            Step::Goto(Mode::DeleteConfirm { awaiting: false })
        );
    }

    #[test]
    fn cancel_from_confirm_returns_to_normal_without_callback() {
        for caps in all_caps().into_iter().filter(|c| c.delete) {
            assert_eq!(
                transition(
                    caps,
                    Mode::DeleteConfirm { awaiting: false },
                    Input::Press(Button::Cancel)
                ),
                Step::Goto(Mode::Normal)
            );
        }
    }

    #[test]
    fn pairing_never_reachable_in_confirm() {
        for caps in all_caps() {
            for mode in [
                Mode::DeleteConfirm { awaiting: false },
                Mode::DeleteConfirm { awaiting: true },
            ] {
                for button in [Button::Pair, Button::Unpair, Button::Delete] {
                    assert_eq!(transition(caps, mode, Input::Press(button)), Step::Ignored);
                    assert!(!controls(caps, mode).clickable(button));
                }
            }
        }
    }

    #[test]
    fn confirm_invokes_delete_and_awaits() {
        assert_eq!(
            transition(
                full(),
                Mode::DeleteConfirm { awaiting: false },
                Input::Press(Button::Confirm)
            ),
            Step::InvokeThen(Invoke::Delete, Mode::DeleteConfirm { awaiting: true })
        );
    }

    #[test]
    fn delete_outcomes() {
        let awaiting = Mode::DeleteConfirm { awaiting: true };
        assert_eq!(
            transition(full(), awaiting, Input::DeleteSucceeded),
            Step::Close(None)
        );
        assert_eq!(
            transition(full(), awaiting, Input::DeleteFailed),
            Step::Goto(Mode::DeleteConfirm { awaiting: false })
        );
    }

    #[test]
    fn late_delete_results_are_ignored() {
        for mode in [Mode::Normal, Mode::DeleteConfirm { awaiting: false }] {
            assert_eq!(transition(full(), mode, Input::DeleteSucceeded), Step::Ignored);
            assert_eq!(transition(full(), mode, Input::DeleteFailed), Step::Ignored);
        }
    }

    #[test]
    fn awaiting_blocks_everything_but_dismiss() {
        let awaiting = Mode::DeleteConfirm { awaiting: true };
        for button in Button::ALL {
            let step = transition(full(), awaiting, Input::Press(button));
            if button == Button::Dismiss {
                assert_eq!(step, Step::Close(None));
            } else {
                assert_eq!(step, Step::Ignored, "{button:?} while awaiting");
            }
        }
    }

    #[test]
    fn save_and_pairing_close_from_normal() {
        assert_eq!(
            transition(full(), Mode::Normal, Input::Press(Button::Save)),
            Step::Close(Some(Invoke::Save))
        );
        assert_eq!(
            transition(full(), Mode::Normal, Input::Press(Button::Pair)),
            Step::Close(Some(Invoke::Pair))
        );
        assert_eq!(
            transition(full(), Mode::Normal, Input::Press(Button::Unpair)),
            Step::Close(Some(Invoke::Unpair))
        );
    }

    #[test]
    fn unconfigured_buttons_do_nothing() {
        let caps = Capabilities::default();
        for button in [
            Button::Save,
            Button::Pair,
            Button::Unpair,
            Button::Delete,
            Button::Confirm,
            Button::Cancel,
        ] {
            assert_eq!(
                transition(caps, Mode::Normal, Input::Press(button)),
                Step::Ignored
            );
        }
    }

    #[test]
    fn visible_controls_agree_with_transitions() {
        for caps in all_caps() {
            for mode in MODES {
                let shown = controls(caps, mode);
                for button in Button::ALL {
                    let acts = transition(caps, mode, Input::Press(button)) != Step::Ignored;
                    assert_eq!(
                        shown.clickable(button),
                        acts,
                        "{button:?} in {mode:?} with {caps:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn confirm_mode_shows_warning_and_hides_pairing() {
        let shown = controls(full(), Mode::DeleteConfirm { awaiting: false });
        assert!(shown.delete_info && shown.confirm && shown.cancel);
        assert!(!shown.pair && !shown.unpair && !shown.delete_entry && !shown.pair_label);
        assert!(shown.input && shown.timing && shown.picker);
    }

    #[test]
    fn pair_label_requires_a_pairing_callback() {
        let opts = DialogOptions::new("t", "l").pairing("Link the remote", None, None);
        assert!(!Capabilities::derive(&opts, false, false, false).pair_label);
        assert!(Capabilities::derive(&opts, false, true, false).pair_label);
    }

    #[test]
    fn delete_requires_option_and_callback() {
        let opts = DialogOptions::new("t", "l").delete(None);
        assert!(!Capabilities::derive(&opts, false, false, false).delete);
        assert!(Capabilities::derive(&opts, false, false, true).delete);
        let no_flag = DialogOptions::new("t", "l");
        assert!(!Capabilities::derive(&no_flag, false, false, true).delete);
    }
}
