//! The orchestration state machine.
//!
//! [`EditorMachine::send`] is the only way session state changes. It returns
//! an [`Effect`] when the transition asks for work to be started; the caller
//! runs it and reports the outcome back as another event.

use tracing::debug;

use super::state::{SessionState, SessionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The document reported readiness with its initial text.
    DocumentReady(String),
    /// The document changed; carries the new plain text.
    DocumentChanged(String),
    /// The user asked for a continuation.
    ContinueRequested,
    GenerationSucceeded(String),
    GenerationFailed(String),
    /// The streaming pass for the pending continuation finished.
    StreamingComplete,
}

/// Work a transition asks the caller to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a generation with this text snapshot as input.
    StartGeneration { text: String },
    /// Stream this continuation into the document.
    Insert { text: String },
}

/// Read-only projection for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub can_continue: bool,
    pub is_generating: bool,
    pub has_error: bool,
    pub is_loading: bool,
    pub char_count: usize,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct EditorMachine {
    status: SessionStatus,
    state: SessionState,
}

impl EditorMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a continue request would be accepted right now.
    ///
    /// Also refuses while a finished continuation is still being streamed,
    /// so at most one generation lifecycle exists at a time.
    pub fn can_continue(&self) -> bool {
        self.status == SessionStatus::Idle
            && !self.state.current_text.trim().is_empty()
            && !self.state.is_loading
            && self.state.pending_generated_text.is_none()
    }

    pub fn view(&self) -> View {
        View {
            can_continue: self.can_continue(),
            is_generating: self.status == SessionStatus::Generating,
            has_error: self.status == SessionStatus::Error,
            is_loading: self.state.is_loading,
            char_count: self.state.current_text.chars().count(),
            error: self.state.last_error.clone(),
        }
    }

    /// Apply one event.
    pub fn send(&mut self, event: EditorEvent) -> Option<Effect> {
        use EditorEvent as E;
        use SessionStatus as S;

        match (self.status, event) {
            (S::Idle, E::DocumentReady(text)) => {
                self.state.current_text = text;
                None
            }
            (S::Idle | S::Generating, E::DocumentChanged(text)) => {
                self.state.current_text = text;
                None
            }
            (S::Idle, E::ContinueRequested) => {
                if !self.can_continue() {
                    debug!("continue request ignored");
                    return None;
                }
                self.state.is_loading = true;
                self.state.last_error = None;
                self.status = S::Generating;
                debug!(chars = self.state.current_text.chars().count(), "generating");
                Some(Effect::StartGeneration {
                    text: self.state.current_text.clone(),
                })
            }
            (S::Generating, E::GenerationSucceeded(text)) => {
                self.state.is_loading = false;
                self.state.pending_generated_text = Some(text.clone());
                self.status = S::Idle;
                Some(Effect::Insert { text })
            }
            (S::Generating, E::GenerationFailed(reason)) => {
                self.state.is_loading = false;
                self.state.last_error = Some(reason);
                self.status = S::Error;
                None
            }
            (S::Idle, E::StreamingComplete) => {
                self.state.pending_generated_text = None;
                None
            }
            (S::Error, E::DocumentChanged(text)) => {
                self.state.current_text = text;
                self.state.last_error = None;
                self.status = S::Idle;
                None
            }
            (status, event) => {
                debug!(?status, ?event, "event ignored");
                None
            }
        }
    }
}
