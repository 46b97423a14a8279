//! Channel bridge: forwards push-channel events into the panel's intent queue.
//!
//! One task reads the WebSocket handle and re-sends every event as
//! [`Intent::Channel`] on the same unbounded queue the effect runner uses,
//! so the main loop sees push events and fetch results in one stream.

use coverly_api::WebSocketHandle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::CommandClient;
use crate::config::PanelConfig;
use crate::error::CoreError;
use crate::panel::Intent;

/// Open the push channel for `client`'s controller and spawn the bridge.
pub fn spawn_channel(
    client: &CommandClient,
    config: &PanelConfig,
    intents: mpsc::UnboundedSender<Intent>,
    cancel: CancellationToken,
) -> Result<(), CoreError> {
    let ws_url = client.api().ws_url()?;
    info!(url = %ws_url, reconnect = config.reconnect.is_some(), "opening push channel");
    let handle = WebSocketHandle::connect(ws_url, config.reconnect.clone(), cancel.child_token());
    tokio::spawn(bridge(handle, intents, cancel));
    Ok(())
}

/// Forward events until the channel task stops or `cancel` fires.
pub async fn bridge(
    mut handle: WebSocketHandle,
    intents: mpsc::UnboundedSender<Intent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                handle.shutdown();
                break;
            }
            event = handle.recv() => {
                let Some(event) = event else { break };
                if intents.send(Intent::Channel(event)).is_err() {
                    handle.shutdown();
                    break;
                }
            }
        }
    }
    debug!("channel bridge stopped");
}
