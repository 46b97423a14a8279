// ── Command client ──
//
// The panel-facing wrapper over `CoverClient`. Commands and actions never
// fail past this point: every call resolves to a `CommandOutcome`, and
// call sites branch on `success`. Fetches keep their `Result` so the
// reducer can leave the registry untouched on error.

use coverly_api::{CommandRequest, CoverClient, DeviceAction, TransportConfig};
use tracing::{debug, warn};

use crate::command::{Command, CommandTarget};
use crate::config::PanelConfig;
use crate::error::CoreError;
use crate::model::{Device, DeviceId, Remote};

/// Result of one command or action round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Controller message, or a locally synthesized one on failure.
    /// May be empty when the controller sent none.
    pub message: String,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// The message, or `fallback` when the controller sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.trim().is_empty() {
            fallback
        } else {
            &self.message
        }
    }
}

/// Issues commands, actions, and list fetches against one controller.
#[derive(Debug, Clone)]
pub struct CommandClient {
    api: CoverClient,
}

impl CommandClient {
    pub fn new(api: CoverClient) -> Self {
        Self { api }
    }

    /// Build the HTTP client from a panel config.
    pub fn from_config(config: &PanelConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        Ok(Self::new(CoverClient::new(config.url.clone(), &transport)?))
    }

    pub fn api(&self) -> &CoverClient {
        &self.api
    }

    /// Send one command. Never returns an error.
    pub async fn send_command(&self, target: &CommandTarget, command: &Command) -> CommandOutcome {
        if let Some(field) = command.missing_field() {
            return CommandOutcome::failed(CoreError::MissingField { field }.to_string());
        }
        let (device_id, remote_id) = match target {
            CommandTarget::Device(id) if id.is_empty() => {
                return CommandOutcome::failed(
                    CoreError::MissingField { field: "device ID" }.to_string(),
                );
            }
            CommandTarget::Remote(id) if id.is_empty() => {
                return CommandOutcome::failed(
                    CoreError::MissingField { field: "remote ID" }.to_string(),
                );
            }
            CommandTarget::Device(id) => (Some(id.to_string()), None),
            CommandTarget::Remote(id) => (None, Some(id.to_string())),
            CommandTarget::None => (None, None),
        };

        let request = CommandRequest {
            device_id,
            remote_id,
            command: command.to_string(),
        };

        match self.api.send_command(&request).await {
            Ok(reply) => {
                debug!(command = %request.command, success = reply.success, "command finished");
                CommandOutcome {
                    success: reply.success,
                    message: reply.message.unwrap_or_default(),
                }
            }
            Err(e) => {
                warn!(error = %e, command = %request.command, "command request failed");
                CommandOutcome::failed(CoreError::from(e).to_string())
            }
        }
    }

    /// Send a motion request. Never returns an error.
    pub async fn send_action(&self, device: &DeviceId, action: DeviceAction) -> CommandOutcome {
        if device.is_empty() {
            let missing = CoreError::MissingField { field: "device ID" };
            return CommandOutcome::failed(missing.to_string());
        }
        match self.api.send_action(device.as_str(), action).await {
            Ok(reply) => CommandOutcome::ok(reply.message.unwrap_or_default()),
            Err(e) => {
                warn!(error = %e, %device, %action, "action request failed");
                CommandOutcome::failed(CoreError::from(e).to_string())
            }
        }
    }

    pub async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        let records = self.api.list_devices().await?;
        Ok(records.into_iter().map(Device::from).collect())
    }

    pub async fn fetch_remotes(&self) -> Result<Vec<Remote>, CoreError> {
        let records = self.api.list_remotes().await?;
        Ok(records.into_iter().map(Remote::from).collect())
    }

    pub async fn fetch_last_address(&self) -> Result<String, CoreError> {
        Ok(self.api.last_address().await?)
    }
}
