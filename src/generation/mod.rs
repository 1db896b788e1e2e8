//! Turns the current document text into a continuation.
//!
//! The actor always resolves: provider failures of any kind are absorbed by
//! waiting out a simulated latency and returning a pre-authored
//! continuation. Only a broken fallback (no continuations to pick from)
//! escapes as a [`GenerationError`].

pub mod fallback;
pub mod prompt;
pub mod provider;

use tracing::{info, warn};

pub use fallback::{DEFAULT_CONTINUATIONS, FallbackPolicy};
pub use prompt::build_prompt;
pub use provider::{ChatCompletionsProvider, CompletionProvider, ProviderError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("no fallback continuations are configured")]
    NoFallback,
    #[error("generation task failed: {0}")]
    Task(String),
}

pub struct GenerationActor<P> {
    provider: P,
    fallback: FallbackPolicy,
}

impl<P: CompletionProvider> GenerationActor<P> {
    pub fn new(provider: P, fallback: FallbackPolicy) -> Self {
        Self { provider, fallback }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Produce a continuation for `text`.
    pub async fn generate(&self, text: &str) -> Result<String, GenerationError> {
        let prompt = build_prompt(text);
        match self.provider.complete(&prompt).await {
            Ok(raw) => {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    info!(chars = trimmed.chars().count(), "provider returned a continuation");
                    return Ok(trimmed.to_string());
                }
                warn!("provider returned an empty continuation, using fallback");
            }
            Err(e) => {
                warn!(error = %e, "provider unavailable, using fallback");
            }
        }

        tokio::time::sleep(self.fallback.delay).await;
        let picked = self.fallback.pick().ok_or(GenerationError::NoFallback)?;
        info!(chars = picked.chars().count(), "returning fallback continuation");
        Ok(picked.to_string())
    }
}
