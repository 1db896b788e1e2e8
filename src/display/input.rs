use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// Type a character at the cursor.
    Insert(char),
    /// Split the current block at the cursor (Enter).
    Newline,
    Backspace,
    Left,
    Right,
    /// Ask for a continuation (Tab).
    Continue,
    /// Ctrl+C or Ctrl+D.
    Quit,
}

/// Map a terminal key event to an action. Only presses count; repeats and
/// releases reported by some terminals are ignored.
pub fn map_key(event: &KeyEvent) -> InputAction {
    if event.kind != KeyEventKind::Press {
        return InputAction::None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char('c' | 'd') if ctrl => InputAction::Quit,
        KeyCode::Char(_) if ctrl || event.modifiers.contains(KeyModifiers::ALT) => {
            InputAction::None
        }
        KeyCode::Char(c) => InputAction::Insert(c),
        KeyCode::Enter => InputAction::Newline,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::Left => InputAction::Left,
        KeyCode::Right => InputAction::Right,
        KeyCode::Tab => InputAction::Continue,
        _ => InputAction::None,
    }
}
