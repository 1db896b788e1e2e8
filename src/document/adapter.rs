use unicode_width::UnicodeWidthChar;

use super::model::Document;
use crate::event::{InsertAt, InsertCommand};

/// Screen coordinates of the cursor, relative to the editor frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub left: usize,
    pub top: usize,
}

/// Geometry of the box the document is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorFrame {
    /// Usable columns for text.
    pub width: usize,
}

/// What the orchestrator learns from the document after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub text: String,
    pub cursor: Option<CursorPosition>,
}

/// Projects document state into plain text and cursor coordinates, and
/// applies insertion commands at the latest insertion point.
#[derive(Debug, Default)]
pub struct ContentAdapter {
    frame: Option<EditorFrame>,
}

impl ContentAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter for a frame that is already mounted.
    pub fn mounted(frame: EditorFrame) -> Self {
        Self { frame: Some(frame) }
    }

    pub fn mount(&mut self, frame: EditorFrame) {
        self.frame = Some(frame);
    }

    pub fn unmount(&mut self) {
        self.frame = None;
    }

    pub fn frame(&self) -> Option<EditorFrame> {
        self.frame
    }

    pub fn on_document_changed(&self, doc: &Document) -> DocumentSnapshot {
        DocumentSnapshot {
            text: doc.text_content(),
            cursor: self.cursor_position(doc),
        }
    }

    /// Cursor coordinates of the selection head, or `None` when no frame is
    /// mounted or the position can't be placed.
    pub fn cursor_position(&self, doc: &Document) -> Option<CursorPosition> {
        let frame = self.frame?;
        if frame.width == 0 {
            return None;
        }
        let (block, offset) = doc.resolve(doc.selection().head)?;

        let top_of_block: usize = doc.blocks()[..block]
            .iter()
            .map(|b| layout_rows(b, frame.width).len())
            .sum();
        let rows = layout_rows(&doc.blocks()[block], frame.width);

        for (index, row) in rows.iter().enumerate() {
            let row_chars = row.text.chars().count();
            let ends_line = row.hard_break || index + 1 == rows.len();
            let end = row.start + row_chars;
            if offset < end || (offset == end && ends_line) {
                let left = row
                    .text
                    .chars()
                    .take(offset - row.start)
                    .map(|c| c.width().unwrap_or(0))
                    .sum();
                return Some(CursorPosition {
                    left,
                    top: top_of_block + index,
                });
            }
        }
        None
    }

    /// Insert at the current insertion point, read fresh on every call.
    pub fn insert_at_current(doc: &mut Document, text: &str) -> usize {
        let at = doc.selection().to();
        doc.insert_text(text, at)
    }

    /// Execute an insertion command against the document.
    pub fn apply(doc: &mut Document, command: &InsertCommand) -> usize {
        match command.at {
            InsertAt::Cursor => Self::insert_at_current(doc, &command.text),
            InsertAt::Position(pos) => doc.insert_text(&command.text, pos),
        }
    }
}

/// One screen row of a block.
struct Row<'a> {
    text: &'a str,
    /// Char offset of the row's first char within the block.
    start: usize,
    /// The row ends at a `\n`, which is not part of `text`.
    hard_break: bool,
}

fn layout_rows(text: &str, width: usize) -> Vec<Row<'_>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut row_char_start = 0;
    let mut col = 0;
    for (char_index, (index, c)) in text.char_indices().enumerate() {
        if c == '\n' {
            rows.push(Row {
                text: &text[row_start..index],
                start: row_char_start,
                hard_break: true,
            });
            row_start = index + c.len_utf8();
            row_char_start = char_index + 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(Row {
                text: &text[row_start..index],
                start: row_char_start,
                hard_break: false,
            });
            row_start = index;
            row_char_start = char_index;
            col = 0;
        }
        col += w;
    }
    rows.push(Row {
        text: &text[row_start..],
        start: row_char_start,
        hard_break: false,
    });
    rows
}

/// Wrap `text` into rows no wider than `width` display columns, breaking
/// at every `\n` as well.
///
/// Always returns at least one row, so empty blocks still take up a line.
pub fn wrap_line(text: &str, width: usize) -> Vec<&str> {
    layout_rows(text, width).into_iter().map(|row| row.text).collect()
}
