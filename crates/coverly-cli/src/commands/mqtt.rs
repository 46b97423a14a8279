//! MQTT bridge settings.

use serde::Serialize;

use coverly_api::MqttConfig;
use coverly_core::CommandClient;

use crate::cli::{GlobalOpts, MqttArgs, MqttCommand};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// What `mqtt show` prints: the password is never echoed.
#[derive(Debug, Serialize)]
struct MqttView<'a> {
    user: &'a str,
    server: &'a str,
    password: &'a str,
    discovery: &'a str,
}

impl<'a> From<&'a MqttConfig> for MqttView<'a> {
    fn from(cfg: &'a MqttConfig) -> Self {
        Self {
            user: &cfg.user,
            server: &cfg.server,
            password: if cfg.password.is_empty() { "" } else { REDACTED },
            discovery: &cfg.discovery,
        }
    }
}

fn detail(view: &MqttView<'_>) -> String {
    let dash = |s: &str| if s.is_empty() { "-".to_owned() } else { s.to_owned() };
    [
        format!("Server:    {}", dash(view.server)),
        format!("User:      {}", dash(view.user)),
        format!("Password:  {}", dash(view.password)),
        format!("Discovery: {}", dash(view.discovery)),
    ]
    .join("\n")
}

/// Overlay the fields given on the command line.
fn merge(
    mut current: MqttConfig,
    user: Option<String>,
    server: Option<String>,
    password: Option<String>,
    discovery: Option<String>,
) -> MqttConfig {
    if let Some(user) = user {
        current.user = user;
    }
    if let Some(server) = server {
        current.server = server;
    }
    if let Some(password) = password {
        current.password = password;
    }
    if let Some(discovery) = discovery {
        current.discovery = discovery;
    }
    current
}

pub async fn handle(
    client: &CommandClient,
    args: MqttArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MqttCommand::Show => {
            let cfg = client.api().mqtt_config().await?;
            let view = MqttView::from(&cfg);
            let out = output::render_single(&global.output, &view, detail, |v| {
                v.server.to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MqttCommand::Set {
            user,
            server,
            password,
            discovery,
        } => {
            if user.is_none() && server.is_none() && password.is_none() && discovery.is_none() {
                return Err(CliError::Validation {
                    field: "mqtt".into(),
                    reason: "nothing to change; pass at least one of --user, --server, \
                             --password, --discovery"
                        .into(),
                });
            }
            let current = client.api().mqtt_config().await?;
            let updated = merge(current, user, server, password, discovery);
            let reply = client.api().update_mqtt_config(&updated).await?;
            if !global.quiet {
                let message = reply.message.as_deref().unwrap_or("MQTT settings saved.");
                eprintln!(
                    "{}",
                    output::status_line(true, message, output::should_color(&global.color))
                );
            }
            Ok(())
        }
    }
}
