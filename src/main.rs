mod cli;

use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{execute, terminal};
use ghostwriter::config::{self, Config};
use ghostwriter::display::renderer::Renderer;
use ghostwriter::display::{term_height, term_width};
use ghostwriter::document::{ContentAdapter, Document, EditorFrame};
use ghostwriter::generation::{ChatCompletionsProvider, GenerationActor};
use ghostwriter::session::Session;
use ghostwriter::session::event_loop::run_session;
use ghostwriter::session::io::Io;
use ghostwriter::streaming::InsertMode;
use tokio::sync::mpsc;
use tracing::{info, warn};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to read working directory")?;
            config::load(&cwd)?
        }
    };
    apply_overrides(&mut config, &cli);

    let document = match &cli.file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Document::from_text(text.trim_end_matches(['\r', '\n']))
        }
        None => Document::new(),
    };

    let provider = ChatCompletionsProvider::from_config(&config.provider)
        .context("failed to set up completion provider")?;
    if provider.has_credential() {
        info!(model = provider.model(), "using completion provider");
    } else {
        warn!(
            env = %config.provider.api_key_env,
            "no API key found, continuations will come from the fallback set"
        );
    }
    let actor = Arc::new(GenerationActor::new(provider, config.fallback_policy()));

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    execute!(std::io::stdout(), terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let mut io = create_live_io();
    let mut session = Session::new(
        document,
        ContentAdapter::mounted(EditorFrame {
            width: term_width(),
        }),
        actor,
        config.inserter(),
        io.sender(),
    );
    let mut renderer = Renderer::new();
    renderer.set_height(term_height());
    let outcome = run_session(&mut session, &mut renderer, &mut io).await;
    info!(?outcome, "session ended");

    execute!(std::io::stdout(), terminal::LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().context("failed to disable raw mode")?;
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.instant {
        config.streaming.mode = InsertMode::Instant;
    }
    if let Some(ms) = cli.char_delay_ms {
        config.streaming.char_delay_ms = ms;
    }
}

/// Send logs to a file; the terminal is taken by the editor.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Install a panic hook that restores terminal state before printing the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        execute!(std::io::stdout(), terminal::LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
        default_hook(info);
    }));
}

/// Create a live `Io` fed by a background task that forwards crossterm
/// events.
fn create_live_io() -> Io {
    use crossterm::event::EventStream;
    use futures::StreamExt;

    let (term_tx, term_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut stream = EventStream::new();
        while let Some(result) = stream.next().await {
            match result {
                Ok(event) => {
                    if term_tx.send(event).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "terminal event stream failed");
                    return;
                }
            }
        }
    });
    Io::new(term_rx)
}
