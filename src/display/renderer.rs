use std::fmt::Display;
use std::io::{self, Write};

use crossterm::style::Print;
use crossterm::{cursor, queue, terminal};

use super::theme;
use crate::document::CursorPosition;
use crate::document::adapter::wrap_line;
use crate::session::machine::View;

const TITLE: &str = "AI Writing Assistant";
const SUBTITLE: &str = "Start writing and let AI help you continue your thoughts";
const PLACEHOLDER: &str = "Start writing your story, article, or any text...";
const HINT: &str = "  Tab to continue · Ctrl+D to exit";

/// Rows drawn above the document.
pub const HEADER_ROWS: usize = 3;
/// Rows reserved below the document: blank, count, action, error.
pub const FOOTER_ROWS: usize = 4;

/// Everything one frame needs.
pub struct Screen<'a> {
    pub blocks: &'a [String],
    pub view: &'a View,
    /// Cursor relative to the document area.
    pub cursor: Option<CursorPosition>,
    pub width: usize,
}

impl Screen<'_> {
    fn is_empty(&self) -> bool {
        self.blocks.iter().all(String::is_empty)
    }
}

/// Draws the editor screen.
pub struct Renderer<W: Write = io::Stdout> {
    out: W,
    /// Terminal height. Without one the whole document is drawn.
    height: Option<usize>,
}

impl Default for Renderer<io::Stdout> {
    fn default() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Renderer<io::Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> Renderer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            out: writer,
            height: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn set_height(&mut self, rows: usize) {
        self.height = Some(rows);
    }

    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Document rows that fit between the header and the footer.
    fn document_rows(&self) -> Option<usize> {
        self.height
            .map(|h| h.saturating_sub(HEADER_ROWS + FOOTER_ROWS).max(1))
    }

    /// Redraw the whole screen.
    ///
    /// When the document is taller than the space left by the header and
    /// footer, only a window of rows is drawn, scrolled just far enough to
    /// keep the cursor row on screen.
    pub fn draw(&mut self, screen: &Screen<'_>) {
        queue!(
            self.out,
            cursor::Hide,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All),
        )
        .ok();

        self.line(theme::title().apply(TITLE));
        self.line(theme::dim().apply(SUBTITLE));
        self.line("");

        let scroll = self.draw_document(screen);

        let view = screen.view;
        self.line("");
        self.line(theme::dim().apply(format!("{} characters", view.char_count)));

        let action = if view.is_generating {
            theme::dim().apply("[ Generating... ]")
        } else if view.can_continue {
            theme::action().apply("[ Continue Writing ]")
        } else {
            theme::dim().apply("[ Continue Writing ]")
        };
        queue!(self.out, Print(action)).ok();
        self.line(theme::dim().apply(HINT));

        if view.has_error {
            let message = view.error.as_deref().unwrap_or_default();
            self.line(theme::error().apply(format!("Error: {message}")));
        }

        if let Some(pos) = screen.cursor {
            queue!(
                self.out,
                cursor::MoveTo(to_u16(pos.left), to_u16(HEADER_ROWS + pos.top - scroll)),
                cursor::Show,
            )
            .ok();
        }
        self.out.flush().ok();
    }

    /// Draw the visible document rows and return how many were scrolled off.
    fn draw_document(&mut self, screen: &Screen<'_>) -> usize {
        let visible = self.document_rows().unwrap_or(usize::MAX);
        if screen.is_empty() {
            self.line(theme::dim().apply(PLACEHOLDER));
            for _ in 1..screen.blocks.len().min(visible) {
                self.line("");
            }
            return 0;
        }

        let rows: Vec<&str> = screen
            .blocks
            .iter()
            .flat_map(|block| wrap_line(block, screen.width))
            .collect();
        let scroll = screen
            .cursor
            .map_or(0, |pos| (pos.top + 1).saturating_sub(visible));
        let loading_row = screen
            .cursor
            .filter(|_| screen.view.is_loading)
            .map(|pos| pos.top);
        for (row, text) in rows.iter().enumerate().skip(scroll).take(visible) {
            queue!(self.out, Print(text)).ok();
            if loading_row == Some(row) {
                queue!(self.out, Print(theme::dim().apply(" ..."))).ok();
            }
            self.line("");
        }
        scroll
    }

    fn line(&mut self, content: impl Display) {
        queue!(self.out, Print(content), Print("\r\n")).ok();
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
