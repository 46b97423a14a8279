// ── Effects ──
//
// Side effects requested by the reducer. The reducer never awaits: it
// returns these, and `EffectRunner` performs them and reports back with
// an `Intent`.

use coverly_api::DeviceAction;

use crate::client::CommandOutcome;
use crate::command::{Command, CommandTarget};
use crate::dialog::SessionId;
use crate::log::LogLevel;
use crate::model::DeviceId;
use crate::registry::{ReloadKind, ReloadTicket};

/// How a finished command is written to the operator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// The controller's message, or the matching fallback when it sent none.
    Outcome {
        success: &'static str,
        failure: &'static str,
    },
    /// Console form: `Command success: …` / `Command failed: …`.
    Console,
}

impl Report {
    pub const fn outcome(success: &'static str, failure: &'static str) -> Self {
        Self::Outcome { success, failure }
    }

    /// The log line for `outcome`.
    pub fn line(self, outcome: &CommandOutcome) -> (LogLevel, String) {
        match (self, outcome.success) {
            (Self::Outcome { success, .. }, true) => {
                (LogLevel::Info, outcome.message_or(success).to_owned())
            }
            (Self::Outcome { failure, .. }, false) => {
                (LogLevel::Error, outcome.message_or(failure).to_owned())
            }
            (Self::Console, true) => (
                LogLevel::Info,
                format!("Command success: {}", outcome.message_or("Command processed.")),
            ),
            (Self::Console, false) => (
                LogLevel::Error,
                format!("Command failed: {}", outcome.message_or("Unknown error.")),
            ),
        }
    }

    /// Fallback used when a failure has no message of its own.
    pub fn failure_fallback(self) -> &'static str {
        match self {
            Self::Outcome { failure, .. } => failure,
            Self::Console => "Unknown error.",
        }
    }
}

/// One command of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub target: CommandTarget,
    pub command: Command,
    pub report: Report,
    /// Reload requested only when this step succeeds.
    pub reload_on_success: Option<ReloadKind>,
}

impl CommandStep {
    pub fn new(target: CommandTarget, command: Command, report: Report) -> Self {
        Self {
            target,
            command,
            report,
            reload_on_success: None,
        }
    }

    #[must_use]
    pub fn reload_on_success(mut self, kind: ReloadKind) -> Self {
        self.reload_on_success = Some(kind);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDevices(ReloadTicket),
    FetchRemotes(ReloadTicket),
    FetchLastAddress,
    /// Send `steps` in order, then reload `then_reload` whatever the outcomes.
    Commands {
        steps: Vec<CommandStep>,
        then_reload: Option<ReloadKind>,
    },
    Action {
        device: DeviceId,
        action: DeviceAction,
    },
    /// The delete behind an open dialog's Confirm button.
    Delete {
        session: SessionId,
        step: CommandStep,
        /// Reloaded after the delete regardless of its outcome.
        always_reload: Option<ReloadKind>,
    },
}

impl Effect {
    /// A single command with no trailing reload.
    pub fn command(step: CommandStep) -> Self {
        Self::Commands {
            steps: vec![step],
            then_reload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_report_uses_fallbacks() {
        let report = Report::outcome("Device added.", "Failed to add device.");
        assert_eq!(
            report.line(&CommandOutcome::ok("")),
            (LogLevel::Info, "Device added.".to_owned())
        );
        assert_eq!(
            report.line(&CommandOutcome::ok("Added #4")),
            (LogLevel::Info, "Added #4".to_owned())
        );
        assert_eq!(
            report.line(&CommandOutcome::failed("")),
            (LogLevel::Error, "Failed to add device.".to_owned())
        );
    }

    #[test]
    fn console_report_wraps_message() {
        assert_eq!(
            Report::Console.line(&CommandOutcome::ok("")).1,
            "Command success: Command processed."
        );
        assert_eq!(
            Report::Console.line(&CommandOutcome::failed("bad syntax")).1,
            "Command failed: bad syntax"
        );
    }
}
