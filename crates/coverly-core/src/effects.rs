// ── Effect runner ──
//
// Performs the reducer's effects on spawned tasks and reports back as
// intents. Nothing here touches panel state.

use tokio::sync::mpsc;
use tracing::debug;

use crate::client::CommandClient;
use crate::panel::{Effect, Intent};

#[derive(Debug, Clone)]
pub struct EffectRunner {
    client: CommandClient,
    intents: mpsc::UnboundedSender<Intent>,
}

impl EffectRunner {
    pub fn new(client: CommandClient, intents: mpsc::UnboundedSender<Intent>) -> Self {
        Self { client, intents }
    }

    /// Spawn one task per effect. Returns immediately.
    pub fn spawn_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            let runner = self.clone();
            tokio::spawn(async move { runner.perform(effect).await });
        }
    }

    /// Perform one effect to completion and send its intents.
    pub async fn perform(&self, effect: Effect) {
        match effect {
            Effect::FetchDevices(ticket) => {
                let result = self.client.fetch_devices().await;
                self.send(Intent::DevicesLoaded { ticket, result });
            }
            Effect::FetchRemotes(ticket) => {
                let result = self.client.fetch_remotes().await;
                self.send(Intent::RemotesLoaded { ticket, result });
            }
            Effect::FetchLastAddress => {
                let result = self.client.fetch_last_address().await;
                self.send(Intent::LastAddressLoaded(result));
            }
            Effect::Commands { steps, then_reload } => {
                for step in steps {
                    let outcome = self.client.send_command(&step.target, &step.command).await;
                    let reload = step.reload_on_success.filter(|_| outcome.success);
                    self.send(Intent::CommandFinished {
                        report: step.report,
                        outcome,
                        reload,
                    });
                }
                if let Some(kind) = then_reload {
                    self.send(Intent::Reload(kind));
                }
            }
            Effect::Action { device, action } => {
                let outcome = self.client.send_action(&device, action).await;
                self.send(Intent::ActionFinished(outcome));
            }
            Effect::Delete {
                session,
                step,
                always_reload,
            } => {
                let outcome = self.client.send_command(&step.target, &step.command).await;
                let reload = step
                    .reload_on_success
                    .filter(|_| outcome.success)
                    .or(always_reload);
                self.send(Intent::DeleteFinished {
                    session,
                    report: step.report,
                    outcome,
                    reload,
                });
            }
        }
    }

    fn send(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            debug!("panel loop gone, dropping effect result");
        }
    }
}
