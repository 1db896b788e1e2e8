pub mod input;
pub mod renderer;
pub mod theme;

/// Query the current terminal width, defaulting to 80.
pub fn term_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
        .max(1)
}

/// Query the current terminal height, defaulting to 24.
pub fn term_height() -> usize {
    crossterm::terminal::size()
        .map(|(_, h)| usize::from(h))
        .unwrap_or(24)
        .max(1)
}
