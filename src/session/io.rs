use crossterm::event::Event;
use tokio::sync::mpsc;

use crate::event::AppEvent;

/// An event from any source the event loop listens to.
#[derive(Debug)]
pub enum IoEvent {
    App(AppEvent),
    Terminal(Event),
}

/// Event sources for the session loop: background work and the terminal.
pub struct Io {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    term_rx: mpsc::UnboundedReceiver<Event>,
}

impl Io {
    pub fn new(term_rx: mpsc::UnboundedReceiver<Event>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            event_tx,
            event_rx,
            term_rx,
        }
    }

    /// Sender handed to background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_tx.clone()
    }

    /// Wait for the next event. Background results win ties so that
    /// streamed characters are never starved by typing. Returns `None` once
    /// the terminal source closes.
    pub async fn next_event(&mut self) -> Option<IoEvent> {
        tokio::select! {
            biased;
            Some(event) = self.event_rx.recv() => Some(IoEvent::App(event)),
            event = self.term_rx.recv() => event.map(IoEvent::Terminal),
        }
    }
}
