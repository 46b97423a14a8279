//! Terminal input pump.
//!
//! A single task merges crossterm's event stream with a frame clock and
//! forwards both over a channel. Only key presses and resizes survive.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New size as (cols, rows).
    Resize(u16, u16),
    /// Time to redraw.
    Frame,
}

/// Start the pump. It stops when `cancel` fires, the terminal stream
/// ends, or the receiver is dropped.
pub fn spawn(frame: Duration, cancel: CancellationToken) -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(pump(tx, frame, cancel));
    rx
}

async fn pump(tx: mpsc::UnboundedSender<Event>, frame: Duration, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut clock = tokio::time::interval(frame);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = clock.tick() => Event::Frame,
            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal input error");
                    continue;
                }
                None => break,
            },
        };
        if tx.send(event).is_err() {
            break;
        }
    }
    debug!("input pump stopped");
}

/// Key releases and repeats, mouse, focus and paste are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('o'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn presses_pass_and_releases_drop() {
        let press = key(KeyEventKind::Press);
        assert_eq!(translate(CrosstermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Repeat))), None);
    }

    #[test]
    fn resize_and_focus() {
        assert_eq!(
            translate(CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        );
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }
}
