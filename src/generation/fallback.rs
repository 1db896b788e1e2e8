use std::time::Duration;

use rand::prelude::*;

/// Simulated provider latency before a fallback continuation is returned.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(2000);

// ── Pre-authored continuations ──────────────────────────────────────────

pub const DEFAULT_CONTINUATIONS: [&str; 5] = [
    " The journey ahead was filled with uncertainty, but there was something liberating about stepping into the unknown.",
    " As the sun began to set, the colors painted across the sky reminded me of childhood summers and forgotten dreams.",
    " Technology has transformed the way we communicate, yet somehow we seem more disconnected than ever before.",
    " The old library held secrets between its weathered pages, stories waiting to be discovered by curious minds.",
    " In that moment of silence, everything became clear - the path forward was not about avoiding obstacles, but embracing them.",
];

/// What the actor does when the provider can't produce a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub delay: Duration,
    pub continuations: Vec<String>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_FALLBACK_DELAY,
            continuations: default_continuations(),
        }
    }
}

impl FallbackPolicy {
    /// Pick one continuation uniformly at random. `None` if the set is empty.
    pub fn pick(&self) -> Option<&str> {
        let mut rng = rand::rng();
        self.continuations.choose(&mut rng).map(String::as_str)
    }
}

pub fn default_continuations() -> Vec<String> {
    DEFAULT_CONTINUATIONS.iter().map(|s| (*s).to_string()).collect()
}
