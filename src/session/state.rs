/// The orchestrator's record of the editing session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Plain-text projection of the document as of the last edit notification.
    pub current_text: String,
    /// True while a generation request is in flight.
    pub is_loading: bool,
    pub last_error: Option<String>,
    /// A finished continuation that has not been streamed in yet.
    pub pending_generated_text: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Generating,
    Error,
}
