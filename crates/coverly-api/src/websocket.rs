//! Push channel with optional auto-reconnect.
//!
//! Connects to the controller's `/ws` endpoint and streams typed
//! [`PushEvent`]s through a single [`tokio::sync::mpsc`] receiver, so events
//! reach the consumer in exactly the order the controller sent them. The
//! channel is receive-only: nothing is ever written back to the socket.
//!
//! # Example
//!
//! ```rust,ignore
//! use coverly_api::websocket::{ChannelEvent, ReconnectConfig, WebSocketHandle};
//! use tokio_util::sync::CancellationToken;
//!
//! let stop = CancellationToken::new();
//! let mut handle = WebSocketHandle::connect(client.ws_url()?, Some(ReconnectConfig::default()), stop.clone());
//!
//! while let Some(event) = handle.recv().await {
//!     if let ChannelEvent::Push(push) = event {
//!         println!("{push:?}");
//!     }
//! }
//! ```

use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::de_id;

// ── PushEvent ────────────────────────────────────────────────────────

/// A typed message pushed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushEvent {
    /// A line for the operator log.
    Log {
        #[serde(default)]
        message: String,
    },
    /// A device reported a new position (percent open).
    Position {
        #[serde(deserialize_with = "de_id")]
        id: String,
        position: i64,
    },
    /// Sent on every new connection: the controller's recent log lines.
    /// Receiving it means the device list should be refetched.
    Init {
        #[serde(default)]
        logs: Vec<String>,
    },
    /// The last remote address the radio heard.
    #[serde(rename = "lastaddr")]
    LastAddr {
        #[serde(default)]
        address: Option<String>,
    },
    /// Any `type` this client does not know about.
    #[serde(other)]
    Unknown,
}

/// What the channel task reports to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The socket handshake completed.
    Connected,
    /// The socket went down (or the first attempt failed).
    Disconnected { reason: Option<String> },
    /// Waiting before the next connection attempt.
    Retrying { attempt: u32, delay: Duration },
    /// A parsed push message.
    Push(PushEvent),
}

// ── Reconnect policy ─────────────────────────────────────────────────

/// How the channel retries after the socket goes down.
///
/// The wait doubles from `first_delay`, is spread by up to a fifth either
/// way so several panels do not reconnect in step, and never exceeds
/// `ceiling`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    pub first_delay: Duration,
    pub ceiling: Duration,
    /// Failed attempts in a row before the channel stays offline.
    /// `None` retries forever.
    pub attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            first_delay: Duration::from_secs(1),
            ceiling: Duration::from_secs(30),
            attempts: None,
        }
    }
}

impl ReconnectConfig {
    /// Wait before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let doubled = self
            .first_delay
            .checked_mul(1_u32.checked_shl(attempt).unwrap_or(u32::MAX))
            .unwrap_or(self.ceiling)
            .min(self.ceiling);
        // Spread in [-0.2, +0.2], fixed per attempt.
        let spread = f64::from(attempt.wrapping_mul(2_654_435_761) % 41) / 100.0 - 0.2;
        doubled.mul_f64(1.0 + spread).min(self.ceiling)
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.attempts.is_some_and(|max| attempt >= max)
    }
}

// ── Handle ───────────────────────────────────────────────────────────

/// Handle to a running push channel.
///
/// Owns the only receiver. Dropping the handle does not stop the task;
/// call [`shutdown`](Self::shutdown) or cancel the token passed to
/// [`connect`](Self::connect).
pub struct WebSocketHandle {
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    cancel: CancellationToken,
}

impl WebSocketHandle {
    /// Spawn the connection loop and return immediately.
    ///
    /// With `reconnect == None` the task makes a single connection and
    /// stops once it ends, leaving the caller in degraded (REST-only) mode.
    pub fn connect(
        ws_url: Url,
        reconnect: Option<ReconnectConfig>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        tokio::spawn(run_channel(ws_url, tx, reconnect, cancel.clone()));
        Self { events, cancel }
    }

    /// Receive the next channel event. `None` once the task has stopped.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Connection loop ──────────────────────────────────────────────────

async fn run_channel(
    url: Url,
    tx: mpsc::UnboundedSender<ChannelEvent>,
    reconnect: Option<ReconnectConfig>,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;
    // `Disconnected` is reported once per outage, not once per failed attempt.
    let mut down_reported = false;

    loop {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = read_session(&url, &tx, &cancel) => outcome,
        };
        if cancel.is_cancelled() {
            break;
        }

        let reason = match outcome {
            Ok(Session::Ended) => {
                tracing::info!("push channel closed");
                attempt = 0;
                down_reported = false;
                None
            }
            Ok(Session::Failed(e)) => {
                tracing::warn!(error = %e, "push channel dropped");
                attempt = 0;
                down_reported = false;
                Some(e.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, "push channel connect failed");
                Some(e.to_string())
            }
        };

        if !down_reported {
            down_reported = true;
            if tx.send(ChannelEvent::Disconnected { reason }).is_err() {
                break;
            }
        }

        let Some(policy) = reconnect.as_ref() else {
            tracing::info!("reconnect disabled, push channel stays offline");
            break;
        };
        if policy.exhausted(attempt) {
            tracing::error!(attempt, "push channel gave up reconnecting");
            break;
        }

        let delay = policy.delay(attempt);
        tracing::info!(?delay, attempt, "push channel retrying");
        if tx.send(ChannelEvent::Retrying { attempt, delay }).is_err() {
            break;
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
        attempt = attempt.saturating_add(1);
    }

    tracing::debug!("push channel task finished");
}

/// How an established connection ended.
enum Session {
    /// Close frame without payload, end of stream, or cancellation.
    Ended,
    /// Read error or close frame after a successful handshake.
    Failed(Error),
}

/// One connection from handshake to drop.
///
/// `Err` means the handshake itself failed.
async fn read_session(
    url: &Url,
    tx: &mpsc::UnboundedSender<ChannelEvent>,
    cancel: &CancellationToken,
) -> Result<Session, Error> {
    tracing::debug!(%url, "opening push channel");
    let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

    tracing::info!(%url, "push channel connected");
    if tx.send(ChannelEvent::Connected).is_err() {
        return Ok(Session::Ended);
    }

    // Receive-only: the write half is dropped.
    let (_, mut frames) = socket.split();

    loop {
        let frame = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(Session::Ended),
            frame = frames.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => {
                let Some(event) = parse_event(&text) else {
                    continue;
                };
                if tx.send(ChannelEvent::Push(event)).is_err() {
                    return Ok(Session::Ended);
                }
            }
            Some(Ok(Message::Close(Some(close)))) => {
                tracing::info!(
                    code = %close.code,
                    reason = %close.reason,
                    "controller closed push channel"
                );
                return Ok(Session::Failed(Error::WebSocketClosed {
                    code: u16::from(close.code),
                    reason: close.reason.to_string(),
                }));
            }
            Some(Ok(Message::Close(None))) | None => return Ok(Session::Ended),
            Some(Err(e)) => return Ok(Session::Failed(Error::WebSocketConnect(e.to_string()))),
            // Pings are answered by tungstenite.
            Some(Ok(_)) => {}
        }
    }
}

// ── Message parsing ──────────────────────────────────────────────────

/// Parse one text frame. Malformed frames are logged and skipped.
fn parse_event(text: &str) -> Option<PushEvent> {
    match serde_json::from_str::<PushEvent>(text) {
        Ok(PushEvent::Unknown) => {
            tracing::debug!(frame = text, "Ignoring push message of unknown type");
            None
        }
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse push message");
            None
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_until_the_ceiling() {
        let policy = ReconnectConfig {
            first_delay: Duration::from_millis(500),
            ceiling: Duration::from_secs(8),
            attempts: None,
        };
        let ms = |attempt| policy.delay(attempt).as_millis();

        assert!((400..=600).contains(&ms(0)));
        assert!(ms(1) > ms(0));
        assert!(ms(2) > ms(1));
        for attempt in (0..64).chain([u32::MAX]) {
            assert!(
                policy.delay(attempt) <= policy.ceiling,
                "attempt {attempt}: {}ms",
                ms(attempt)
            );
        }
        assert!(ms(5) >= 6_400);
    }

    #[test]
    fn attempts_limit_is_inclusive() {
        let policy = ReconnectConfig {
            attempts: Some(3),
            ..ReconnectConfig::default()
        };
        assert!(!policy.exhausted(2));
        assert!(policy.exhausted(3));
        assert!(!ReconnectConfig::default().exhausted(u32::MAX));
    }

    #[test]
    fn parse_log_event() {
        let event = parse_event(r#"{"type":"log","message":"Radio ready"}"#).unwrap();
        assert_eq!(
            event,
            PushEvent::Log {
                message: "Radio ready".into()
            }
        );
    }

    #[test]
    fn parse_position_event_with_numeric_id() {
        let event = parse_event(r#"{"type":"position","id":3,"position":75}"#).unwrap();
        assert_eq!(
            event,
            PushEvent::Position {
                id: "3".into(),
                position: 75
            }
        );
    }

    #[test]
    fn parse_init_event() {
        let event = parse_event(r#"{"type":"init","logs":["a","b"]}"#).unwrap();
        assert_eq!(
            event,
            PushEvent::Init {
                logs: vec!["a".into(), "b".into()]
            }
        );
    }

    #[test]
    fn parse_lastaddr_event() {
        let event = parse_event(r#"{"type":"lastaddr","address":"0A1B2C"}"#).unwrap();
        assert_eq!(
            event,
            PushEvent::LastAddr {
                address: Some("0A1B2C".into())
            }
        );
    }

    #[test]
    fn unknown_type_is_skipped() {
        assert!(parse_event(r#"{"type":"heartbeat","n":1}"#).is_none());
    }

    #[test]
    fn malformed_json_is_skipped() {
        assert!(parse_event("not json at all").is_none());
        assert!(parse_event(r#"{"type":"position","id":"d1"}"#).is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_disconnect_once_without_reconnect() {
        let cancel = CancellationToken::new();
        let url = Url::parse("ws://127.0.0.1:9/ws").unwrap();
        let mut handle = WebSocketHandle::connect(url, None, cancel.clone());

        match handle.recv().await {
            Some(ChannelEvent::Disconnected { reason }) => assert!(reason.is_some()),
            other => panic!("expected Disconnected, got {other:?}"),
        }
        // Degraded mode: the task stops and the channel closes.
        assert!(handle.recv().await.is_none());
        handle.shutdown();
    }

    #[tokio::test]
    async fn retry_loop_stops_once_consumer_is_gone() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let policy = ReconnectConfig {
            first_delay: Duration::from_millis(10),
            ceiling: Duration::from_millis(50),
            attempts: None,
        };
        let url = Url::parse("ws://127.0.0.1:9/ws").unwrap();
        let task = tokio::spawn(run_channel(url, tx, Some(policy), CancellationToken::new()));

        assert!(matches!(rx.recv().await, Some(ChannelEvent::Disconnected { .. })));
        drop(rx);

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("channel task kept retrying with nobody listening")
            .unwrap();
    }
}
