use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::machine::{EditorEvent, EditorMachine, Effect, View};
use super::runner;
use crate::document::{ContentAdapter, CursorPosition, Document, EditorFrame};
use crate::event::AppEvent;
use crate::generation::{CompletionProvider, GenerationActor};
use crate::streaming::StreamingInserter;

/// Owns the document and the state machine, and wires machine effects to
/// background tasks. All mutation happens on the caller's task; background
/// work only ever talks back through `event_tx`.
pub struct Session<P> {
    document: Document,
    adapter: ContentAdapter,
    machine: EditorMachine,
    cursor: Option<CursorPosition>,
    actor: Arc<GenerationActor<P>>,
    inserter: StreamingInserter,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl<P: CompletionProvider + 'static> Session<P> {
    /// Create the session and report the document as ready.
    pub fn new(
        document: Document,
        adapter: ContentAdapter,
        actor: Arc<GenerationActor<P>>,
        inserter: StreamingInserter,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let mut session = Self {
            document,
            adapter,
            machine: EditorMachine::new(),
            cursor: None,
            actor,
            inserter,
            event_tx,
        };
        let snapshot = session.adapter.on_document_changed(&session.document);
        session.cursor = snapshot.cursor;
        session.dispatch(EditorEvent::DocumentReady(snapshot.text));
        session
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn machine(&self) -> &EditorMachine {
        &self.machine
    }

    pub fn view(&self) -> View {
        self.machine.view()
    }

    /// Cursor position as of the last edit notification.
    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    pub fn frame(&self) -> Option<EditorFrame> {
        self.adapter.frame()
    }

    /// Re-mount the editor in a frame of a different size.
    pub fn resize(&mut self, frame: EditorFrame) {
        self.adapter.mount(frame);
        self.cursor = self.adapter.cursor_position(&self.document);
    }

    /// Apply a user edit and notify the machine.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = f(&mut self.document);
        self.notify_changed();
        result
    }

    pub fn request_continue(&mut self) {
        self.dispatch(EditorEvent::ContinueRequested);
    }

    /// Stop any streaming pass still writing into the document.
    pub fn stop_streaming(&self) {
        self.inserter.cancel_flag().cancel();
    }

    /// Feed back the result of background work.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Generation(Ok(text)) => self.dispatch(EditorEvent::GenerationSucceeded(text)),
            AppEvent::Generation(Err(reason)) => {
                self.dispatch(EditorEvent::GenerationFailed(reason));
            }
            AppEvent::Insert(command) => {
                ContentAdapter::apply(&mut self.document, &command);
                self.notify_changed();
            }
            AppEvent::StreamingComplete => self.dispatch(EditorEvent::StreamingComplete),
        }
    }

    fn notify_changed(&mut self) {
        let snapshot = self.adapter.on_document_changed(&self.document);
        self.cursor = snapshot.cursor;
        self.dispatch(EditorEvent::DocumentChanged(snapshot.text));
    }

    fn dispatch(&mut self, event: EditorEvent) {
        if let Some(effect) = self.machine.send(event) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartGeneration { text } => {
                info!(chars = text.chars().count(), "starting generation");
                runner::spawn_generation(Arc::clone(&self.actor), text, self.event_tx.clone());
            }
            Effect::Insert { text } => {
                let start = self.document.selection().to();
                debug!(start, chars = text.chars().count(), "starting streaming pass");
                runner::spawn_streaming(self.inserter.clone(), text, start, self.event_tx.clone());
            }
        }
    }
}
