/// Where an insertion lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// The document's insertion point at the moment the command is applied.
    Cursor,
    /// A fixed document position.
    Position(usize),
}

/// One write into the document, executed by whoever owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCommand {
    pub text: String,
    pub at: InsertAt,
}

/// Results of background work, delivered back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The generation task resolved. `Err` carries an actor-fatal reason.
    Generation(Result<String, String>),
    /// The streaming task wants a piece of text written into the document.
    Insert(InsertCommand),
    /// The streaming task finished its pass.
    StreamingComplete,
}
