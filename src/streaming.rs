//! Replays a finished continuation into the document one character at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::document::{ContentAdapter, Document};
use crate::event::{AppEvent, InsertAt, InsertCommand};

/// Default pause between streamed characters.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// Type the text out character by character.
    #[default]
    Streaming,
    /// Insert the whole text in one step at the cursor.
    Instant,
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("insertion target is gone")]
    SinkClosed,
}

/// Something that accepts insertion commands.
pub trait InsertSink {
    fn insert(&mut self, command: InsertCommand) -> Result<(), StreamError>;
}

impl InsertSink for mpsc::UnboundedSender<AppEvent> {
    fn insert(&mut self, command: InsertCommand) -> Result<(), StreamError> {
        self.send(AppEvent::Insert(command))
            .map_err(|_| StreamError::SinkClosed)
    }
}

impl InsertSink for Document {
    fn insert(&mut self, command: InsertCommand) -> Result<(), StreamError> {
        ContentAdapter::apply(self, &command);
        Ok(())
    }
}

/// Shared stop flag for a streaming pass.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a streaming pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed { inserted: usize },
    Cancelled { inserted: usize },
}

#[derive(Debug, Clone)]
pub struct StreamingInserter {
    delay: Duration,
    mode: InsertMode,
    cancel: CancelFlag,
}

impl Default for StreamingInserter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_DELAY, InsertMode::Streaming)
    }
}

impl StreamingInserter {
    pub fn new(delay: Duration, mode: InsertMode) -> Self {
        Self {
            delay,
            mode,
            cancel: CancelFlag::new(),
        }
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle that stops any pass run by this inserter (or its clones).
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Write `text` into `sink`, starting at document position `start`.
    ///
    /// In streaming mode character `i` goes to `start + i` regardless of
    /// what else happened to the document meanwhile. Instant mode ignores
    /// `start` and inserts everything at the live cursor.
    pub async fn insert<S: InsertSink>(
        &self,
        text: &str,
        start: usize,
        sink: &mut S,
    ) -> Result<StreamOutcome, StreamError> {
        if self.mode == InsertMode::Instant {
            sink.insert(InsertCommand {
                text: text.to_string(),
                at: InsertAt::Cursor,
            })?;
            return Ok(StreamOutcome::Completed {
                inserted: text.chars().count(),
            });
        }

        let mut inserted = 0;
        for (i, ch) in text.chars().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(StreamOutcome::Cancelled { inserted });
            }
            sink.insert(InsertCommand {
                text: ch.to_string(),
                at: InsertAt::Position(start + i),
            })?;
            inserted += 1;
            tokio::time::sleep(self.delay).await;
        }
        Ok(StreamOutcome::Completed { inserted })
    }
}
