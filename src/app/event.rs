//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the preview loop.
#[derive(Debug)]
pub enum PreviewEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

/// Spawns a background task that polls the terminal and sends events through
/// the returned channel.  Key releases are dropped so each press acts once.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<PreviewEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind != KeyEventKind::Release => PreviewEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) => PreviewEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => PreviewEvent::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("terminal read failed: {e}");
                        break;
                    }
                },
                Ok(false) => PreviewEvent::Tick,
                Err(e) => {
                    tracing::warn!("terminal poll failed: {e}");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
