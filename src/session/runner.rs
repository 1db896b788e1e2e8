use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::event::AppEvent;
use crate::generation::{CompletionProvider, GenerationActor, GenerationError};
use crate::streaming::{StreamOutcome, StreamingInserter};

/// Run one generation in the background and report its outcome on `event_tx`.
///
/// The actor runs in its own task so that a panic inside it still produces
/// an outcome (a failed one) instead of leaving the session generating.
pub fn spawn_generation<P>(
    actor: Arc<GenerationActor<P>>,
    text: String,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()>
where
    P: CompletionProvider + 'static,
{
    tokio::spawn(async move {
        let task = tokio::spawn(async move { actor.generate(&text).await });
        let outcome = match task.await {
            Ok(Ok(continuation)) => Ok(continuation),
            Ok(Err(e)) => {
                error!(error = %e, "generation failed");
                Err(e.to_string())
            }
            Err(join_err) => {
                let e = GenerationError::Task(join_err.to_string());
                error!(error = %e, "generation task died");
                Err(e.to_string())
            }
        };
        if event_tx.send(AppEvent::Generation(outcome)).is_err() {
            debug!("session gone before generation finished");
        }
    })
}

/// Stream `text` into the document starting at `start`, then signal completion.
pub fn spawn_streaming(
    inserter: StreamingInserter,
    text: String,
    start: usize,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut sink = event_tx.clone();
        match inserter.insert(&text, start, &mut sink).await {
            Ok(StreamOutcome::Completed { inserted }) => {
                debug!(inserted, "streaming pass complete");
            }
            Ok(StreamOutcome::Cancelled { inserted }) => {
                debug!(inserted, "streaming pass cancelled");
            }
            Err(e) => {
                warn!(error = %e, "streaming pass aborted");
                return;
            }
        }
        if event_tx.send(AppEvent::StreamingComplete).is_err() {
            debug!("session gone before streaming finished");
        }
    })
}
