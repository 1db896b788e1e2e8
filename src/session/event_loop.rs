use std::io::Write;

use crossterm::event::Event;
use tracing::{debug, info};

use super::io::{Io, IoEvent};
use super::orchestrator::Session;
use crate::display::input::{InputAction, map_key};
use crate::display::renderer::{Renderer, Screen};
use crate::document::{Document, EditorFrame};
use crate::generation::CompletionProvider;

/// How the session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User pressed Ctrl+C or Ctrl+D.
    Quit,
    /// The terminal event source closed.
    TerminalClosed,
}

/// Run the interactive loop until the user quits.
///
/// Background results (generation outcomes, streamed characters) and
/// terminal input are handled one at a time on this task, so the document
/// and the state machine are never touched concurrently.
pub async fn run_session<P, W>(
    session: &mut Session<P>,
    renderer: &mut Renderer<W>,
    io: &mut Io,
) -> SessionOutcome
where
    P: CompletionProvider + 'static,
    W: Write,
{
    draw(session, renderer);
    loop {
        let Some(event) = io.next_event().await else {
            info!("terminal closed");
            return SessionOutcome::TerminalClosed;
        };
        match event {
            IoEvent::App(app_event) => session.handle_app_event(app_event),
            IoEvent::Terminal(Event::Key(key)) => {
                if apply_action(session, map_key(&key)) == LoopAction::Quit {
                    info!("quit requested");
                    session.stop_streaming();
                    return SessionOutcome::Quit;
                }
            }
            IoEvent::Terminal(Event::Resize(width, height)) => {
                debug!(width, height, "terminal resized");
                renderer.set_height(usize::from(height));
                session.resize(EditorFrame {
                    width: usize::from(width).max(1),
                });
            }
            IoEvent::Terminal(_) => continue,
        }
        draw(session, renderer);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Quit,
}

fn apply_action<P>(session: &mut Session<P>, action: InputAction) -> LoopAction
where
    P: CompletionProvider + 'static,
{
    match action {
        InputAction::None => {}
        InputAction::Insert(c) => {
            session.edit(|doc| doc.type_text(c.encode_utf8(&mut [0; 4])));
        }
        InputAction::Newline => session.edit(Document::split_block),
        InputAction::Backspace => {
            session.edit(Document::delete_backward);
        }
        InputAction::Left => session.edit(Document::move_left),
        InputAction::Right => session.edit(Document::move_right),
        InputAction::Continue => session.request_continue(),
        InputAction::Quit => return LoopAction::Quit,
    }
    LoopAction::Continue
}

fn draw<P, W>(session: &Session<P>, renderer: &mut Renderer<W>)
where
    P: CompletionProvider + 'static,
    W: Write,
{
    let view = session.view();
    let width = session.frame().map_or(80, |frame| frame.width);
    renderer.draw(&Screen {
        blocks: session.document().blocks(),
        view: &view,
        cursor: session.cursor(),
        width,
    });
}
