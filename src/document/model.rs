//! Block-structured plain-text document with a selection.
//!
//! Positions are flat document positions: every block occupies its content
//! length plus two positions (an opening and a closing token), and the
//! first block's content starts at position 1. A position strictly between
//! two blocks is never a valid insertion point on its own; edits clamp it
//! to the nearest block content.

/// A selection expressed in document positions. `anchor == head` is a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// End of the selection, where generated text is inserted.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    fn map_insert(&mut self, at: usize, len: usize) {
        if self.anchor >= at {
            self.anchor += len;
        }
        if self.head >= at {
            self.head += len;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<String>,
    selection: Selection,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: vec![String::new()],
            selection: Selection::cursor(1),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document with one block per line, cursor at the very end.
    pub fn from_text(text: &str) -> Self {
        let mut blocks: Vec<String> = text.lines().map(str::to_string).collect();
        if blocks.is_empty() {
            blocks.push(String::new());
        }
        let mut doc = Self {
            blocks,
            selection: Selection::cursor(1),
        };
        doc.selection = Selection::cursor(doc.end_of_content());
        doc
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the selection, clamping both ends into block content.
    pub fn set_selection(&mut self, selection: Selection) {
        let anchor = self.clamp(selection.anchor);
        let head = self.clamp(selection.head);
        self.selection = Selection { anchor, head };
    }

    /// Plain-text content: every block's text concatenated, no separators.
    pub fn text_content(&self) -> String {
        self.blocks.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(String::is_empty)
    }

    /// Total size in document positions.
    pub fn size(&self) -> usize {
        self.blocks.iter().map(|b| char_len(b) + 2).sum()
    }

    /// Position of the end of the last block's content.
    pub fn end_of_content(&self) -> usize {
        self.size() - 1
    }

    /// Position where the content of block `index` starts.
    pub fn block_start(&self, index: usize) -> usize {
        1 + self.blocks[..index]
            .iter()
            .map(|b| char_len(b) + 2)
            .sum::<usize>()
    }

    /// Resolve a position to `(block, char offset)`, or `None` if it falls on
    /// a block boundary token or past the end of the document.
    pub fn resolve(&self, pos: usize) -> Option<(usize, usize)> {
        let mut start = 1;
        for (index, block) in self.blocks.iter().enumerate() {
            let len = char_len(block);
            if pos >= start && pos <= start + len {
                return Some((index, pos - start));
            }
            start += len + 2;
        }
        None
    }

    /// Resolve a position, snapping boundary tokens to the nearest content.
    fn resolve_clamped(&self, pos: usize) -> (usize, usize) {
        let mut start = 1;
        for (index, block) in self.blocks.iter().enumerate() {
            let len = char_len(block);
            if pos < start {
                return (index, 0);
            }
            if pos <= start + len {
                return (index, pos - start);
            }
            start += len + 2;
        }
        let last = self.blocks.len() - 1;
        (last, char_len(&self.blocks[last]))
    }

    fn clamp(&self, pos: usize) -> usize {
        let (block, offset) = self.resolve_clamped(pos);
        self.block_start(block) + offset
    }

    /// Insert `text` at `pos` and return the position right after it.
    ///
    /// Selection endpoints at or after the insertion point move forward, so
    /// a cursor sitting at `pos` ends up after the inserted text.
    pub fn insert_text(&mut self, text: &str, pos: usize) -> usize {
        let (block, offset) = self.resolve_clamped(pos);
        let at = self.block_start(block) + offset;
        let len = char_len(text);
        if len == 0 {
            return at;
        }
        let target = &mut self.blocks[block];
        let byte = byte_index(target, offset);
        target.insert_str(byte, text);
        self.selection.map_insert(at, len);
        at + len
    }

    /// Type text at the cursor, replacing any selected range.
    pub fn type_text(&mut self, text: &str) -> usize {
        if !self.selection.is_empty() {
            self.delete_selection();
        }
        self.insert_text(text, self.selection.to())
    }

    /// Split the block at the cursor (Enter).
    pub fn split_block(&mut self) {
        if !self.selection.is_empty() {
            self.delete_selection();
        }
        let (block, offset) = self.resolve_clamped(self.selection.head);
        let byte = byte_index(&self.blocks[block], offset);
        let tail = self.blocks[block].split_off(byte);
        self.blocks.insert(block + 1, tail);
        self.selection = Selection::cursor(self.block_start(block + 1));
    }

    /// Delete the character before the cursor, joining blocks at a block
    /// start. Returns whether anything changed.
    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            self.delete_selection();
            return true;
        }
        let (block, offset) = self.resolve_clamped(self.selection.head);
        if offset > 0 {
            let target = &mut self.blocks[block];
            let byte = byte_index(target, offset - 1);
            target.remove(byte);
            self.selection = Selection::cursor(self.block_start(block) + offset - 1);
            true
        } else if block > 0 {
            let tail = self.blocks.remove(block);
            let prev_len = char_len(&self.blocks[block - 1]);
            self.blocks[block - 1].push_str(&tail);
            self.selection = Selection::cursor(self.block_start(block - 1) + prev_len);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        let (block, offset) = self.resolve_clamped(self.selection.head);
        let pos = if offset > 0 {
            self.block_start(block) + offset - 1
        } else if block > 0 {
            self.block_start(block - 1) + char_len(&self.blocks[block - 1])
        } else {
            self.block_start(0)
        };
        self.selection = Selection::cursor(pos);
    }

    pub fn move_right(&mut self) {
        let (block, offset) = self.resolve_clamped(self.selection.head);
        let pos = if offset < char_len(&self.blocks[block]) {
            self.block_start(block) + offset + 1
        } else if block + 1 < self.blocks.len() {
            self.block_start(block + 1)
        } else {
            self.block_start(block) + offset
        };
        self.selection = Selection::cursor(pos);
    }

    /// Remove the selected range (only within a single block; a range that
    /// spans blocks collapses to its end).
    fn delete_selection(&mut self) {
        let (from_block, from_off) = self.resolve_clamped(self.selection.from());
        let (to_block, to_off) = self.resolve_clamped(self.selection.to());
        if from_block == to_block {
            let target = &mut self.blocks[from_block];
            let start = byte_index(target, from_off);
            let end = byte_index(target, to_off);
            target.replace_range(start..end, "");
            self.selection = Selection::cursor(self.block_start(from_block) + from_off);
        } else {
            self.selection = Selection::cursor(self.selection.to());
        }
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map_or(s.len(), |(index, _)| index)
}
