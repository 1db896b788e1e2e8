//! Headless sessions driven end to end with scripted providers on virtual time.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ghostwriter::config::ProviderConfig;
use ghostwriter::document::{ContentAdapter, Document, EditorFrame};
use ghostwriter::event::AppEvent;
use ghostwriter::generation::{
    ChatCompletionsProvider, CompletionProvider, DEFAULT_CONTINUATIONS, FallbackPolicy,
    GenerationActor, ProviderError, build_prompt,
};
use ghostwriter::session::Session;
use ghostwriter::session::state::SessionStatus;
use ghostwriter::streaming::{InsertMode, StreamingInserter};
use tokio::sync::mpsc;
use tokio::time::Instant;

enum Reply {
    Text(&'static str),
    Fail,
    Panic,
}

/// Provider that answers after `latency` and records every prompt.
struct Scripted {
    reply: Reply,
    latency: Duration,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            latency: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl CompletionProvider for Scripted {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        tokio::time::sleep(self.latency).await;
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(ProviderError::Malformed("scripted failure".into())),
            Reply::Panic => panic!("provider blew up"),
        }
    }
}

struct Harness<P> {
    session: Session<P>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    actor: Arc<GenerationActor<P>>,
}

impl<P: CompletionProvider + 'static> Harness<P> {
    fn new(text: &str, provider: P, fallback: FallbackPolicy, inserter: StreamingInserter) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = Arc::new(GenerationActor::new(provider, fallback));
        let session = Session::new(
            Document::from_text(text),
            ContentAdapter::mounted(EditorFrame { width: 80 }),
            Arc::clone(&actor),
            inserter,
            tx,
        );
        Self { session, rx, actor }
    }

    /// Feed one background event into the session.
    async fn step(&mut self) -> AppEvent {
        let event = self.rx.recv().await.unwrap();
        self.session.handle_app_event(event.clone());
        event
    }

    /// Feed background events until the streaming pass finishes.
    async fn run_to_quiescence(&mut self) {
        while self.step().await != AppEvent::StreamingComplete {}
    }

    fn text(&self) -> String {
        self.session.document().text_content()
    }
}

fn quick_fallback(continuations: &[&str]) -> FallbackPolicy {
    FallbackPolicy {
        delay: Duration::from_millis(50),
        continuations: continuations.iter().map(|c| (*c).to_string()).collect(),
    }
}

#[tokio::test(start_paused = true)]
async fn whitespace_only_text_never_reaches_the_provider() {
    let mut h = Harness::new(
        "   ",
        Scripted::new(Reply::Text("never")),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();

    assert_eq!(h.session.machine().status(), SessionStatus::Idle);
    assert!(!h.session.view().is_loading);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.rx.try_recv().is_err());
    assert_eq!(h.actor.provider().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn second_continue_while_generating_is_ignored() {
    let mut h = Harness::new(
        "Once ",
        Scripted::new(Reply::Text("upon a time.")).with_latency(Duration::from_millis(100)),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    let before = h.session.machine().state().clone();
    h.session.request_continue();

    assert_eq!(h.session.machine().status(), SessionStatus::Generating);
    assert_eq!(h.session.machine().state(), &before);

    h.run_to_quiescence().await;
    assert_eq!(h.actor.provider().calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.text(), "Once upon a time.");
}

#[tokio::test(start_paused = true)]
async fn hello_world_without_credential_streams_a_mock_continuation() {
    let provider = ChatCompletionsProvider::new(&ProviderConfig::default(), None).unwrap();
    let mut h = Harness::new(
        "Hello world",
        provider,
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    let start = Instant::now();
    h.session.request_continue();
    assert_eq!(h.session.machine().status(), SessionStatus::Generating);
    assert!(h.session.view().is_loading);

    let AppEvent::Generation(Ok(mock)) = h.step().await else {
        panic!("expected a successful generation");
    };
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert!(DEFAULT_CONTINUATIONS.contains(&mock.as_str()));
    assert_eq!(h.session.machine().status(), SessionStatus::Idle);
    assert!(!h.session.view().is_loading);

    let streaming_start = Instant::now();
    h.run_to_quiescence().await;
    let chars = u32::try_from(mock.chars().count()).unwrap();
    assert!(streaming_start.elapsed() >= Duration::from_millis(10) * chars);
    assert_eq!(h.text(), format!("Hello world{mock}"));
    assert_eq!(h.session.machine().status(), SessionStatus::Idle);
    assert_eq!(h.session.machine().state().pending_generated_text, None);
    assert_eq!(h.session.machine().state().current_text, h.text());
}

#[tokio::test(start_paused = true)]
async fn edit_during_generation_updates_text_but_not_the_prompt() {
    let mut h = Harness::new(
        "Hello world",
        Scripted::new(Reply::Text("The end.")).with_latency(Duration::from_millis(300)),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    h.session.edit(|doc| doc.type_text(". "));

    assert_eq!(h.session.machine().status(), SessionStatus::Generating);
    assert_eq!(h.session.machine().state().current_text, "Hello world. ");

    h.run_to_quiescence().await;
    let prompts = h.actor.provider().prompts.lock().unwrap().clone();
    assert_eq!(prompts, [build_prompt("Hello world")]);
    assert_eq!(h.text(), "Hello world. The end.");
}

#[tokio::test(start_paused = true)]
async fn pending_text_lives_until_the_streaming_pass_ends() {
    let mut h = Harness::new(
        "Start",
        Scripted::new(Reply::Text("abc")),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    assert_eq!(h.session.machine().state().pending_generated_text, None);

    assert_eq!(h.step().await, AppEvent::Generation(Ok("abc".into())));
    assert_eq!(
        h.session.machine().state().pending_generated_text.as_deref(),
        Some("abc")
    );

    loop {
        let event = h.step().await;
        if event == AppEvent::StreamingComplete {
            break;
        }
        assert!(matches!(event, AppEvent::Insert(_)));
        assert!(h.session.machine().state().pending_generated_text.is_some());
        assert!(!h.session.view().can_continue);
    }

    assert_eq!(h.session.machine().state().pending_generated_text, None);
    assert_eq!(h.text(), "Startabc");
    assert!(h.session.view().can_continue);
}

#[tokio::test(start_paused = true)]
async fn typing_between_streamed_characters_keeps_the_continuation_contiguous() {
    let mut h = Harness::new(
        "Start",
        Scripted::new(Reply::Text("abcdef")),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    assert!(matches!(h.step().await, AppEvent::Generation(Ok(_))));
    for _ in 0..3 {
        assert!(matches!(h.step().await, AppEvent::Insert(_)));
    }
    assert_eq!(h.text(), "Startabc");

    h.session.edit(|doc| doc.type_text("z"));
    assert_eq!(h.session.machine().state().current_text, "Startabcz");

    h.run_to_quiescence().await;
    assert_eq!(h.text(), "Startabcdefz");
    assert_eq!(h.session.machine().state().current_text, h.text());
    assert_eq!(h.session.machine().state().pending_generated_text, None);
    assert_eq!(h.session.machine().status(), SessionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn provider_failure_uses_fallback() {
    let mut h = Harness::new(
        "It was late",
        Scripted::new(Reply::Fail),
        quick_fallback(&[" and quiet."]),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    h.run_to_quiescence().await;
    assert_eq!(h.text(), "It was late and quiet.");
    assert_eq!(h.session.machine().state().last_error, None);
}

#[tokio::test(start_paused = true)]
async fn error_then_one_keystroke_recovers() {
    let mut h = Harness::new(
        "Dead end",
        Scripted::new(Reply::Fail),
        quick_fallback(&[]),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    assert!(matches!(h.step().await, AppEvent::Generation(Err(_))));

    assert_eq!(h.session.machine().status(), SessionStatus::Error);
    let view = h.session.view();
    assert!(view.has_error);
    assert!(!view.is_loading);
    assert!(!view.can_continue);
    assert_eq!(
        view.error.as_deref(),
        Some("no fallback continuations are configured")
    );

    h.session.request_continue();
    assert_eq!(h.session.machine().status(), SessionStatus::Error);

    h.session.edit(|doc| doc.type_text("."));
    assert_eq!(h.session.machine().status(), SessionStatus::Idle);
    assert_eq!(h.session.machine().state().last_error, None);
    assert_eq!(h.session.machine().state().current_text, "Dead end.");
}

#[tokio::test(start_paused = true)]
async fn panicking_provider_ends_in_error() {
    let mut h = Harness::new(
        "Boom",
        Scripted::new(Reply::Panic),
        FallbackPolicy::default(),
        StreamingInserter::default(),
    );
    h.session.request_continue();
    let AppEvent::Generation(Err(reason)) = h.step().await else {
        panic!("expected a failed generation");
    };
    assert!(reason.starts_with("generation task failed"));
    assert_eq!(h.session.machine().status(), SessionStatus::Error);
    assert!(!h.session.view().is_loading);
}

#[tokio::test(start_paused = true)]
async fn instant_mode_inserts_in_one_step() {
    let mut h = Harness::new(
        "Fast ",
        Scripted::new(Reply::Text("and done.")),
        FallbackPolicy::default(),
        StreamingInserter::new(Duration::from_millis(10), InsertMode::Instant),
    );
    h.session.request_continue();
    assert!(matches!(h.step().await, AppEvent::Generation(Ok(_))));

    let start = Instant::now();
    assert!(matches!(h.step().await, AppEvent::Insert(_)));
    assert_eq!(h.step().await, AppEvent::StreamingComplete);
    assert!(start.elapsed() < Duration::from_millis(10));
    assert_eq!(h.text(), "Fast and done.");
    assert_eq!(h.session.machine().state().pending_generated_text, None);
}
