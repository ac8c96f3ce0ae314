//! LLM backend implementations and selection.

pub mod envelope;
pub mod gemini;
pub mod ollama;

use std::sync::Arc;

use {async_trait::async_trait, courier_config::{BackendKind, CourierConfig}};

pub use crate::{
    envelope::{Envelope, DEFAULT_IMAGE_PROMPT},
    gemini::GeminiBackend,
    ollama::OllamaBackend,
};

/// Shared HTTP client for backends.
///
/// All backends that don't need custom redirect/proxy settings reuse this
/// client to share connection pools, DNS cache, and TLS sessions.
pub fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::LazyLock<reqwest::Client> =
        std::sync::LazyLock::new(reqwest::Client::new);
    &CLIENT
}

/// A pluggable component that turns an [`Envelope`] into model-generated
/// text.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    /// Model identifier (e.g. "qwen3-vl:2b", "gemini-1.5-flash").
    fn model(&self) -> &str;

    /// Whether this backend accepts image attachments. Backends that return
    /// false receive text-only envelopes; the dispatcher drops the image
    /// with a warning.
    fn supports_vision(&self) -> bool {
        false
    }

    /// Produce a completion for the envelope.
    ///
    /// On success the result is always a string — implementations coerce a
    /// missing completion field to `""` so the sanitizer's fallback applies
    /// uniformly.
    async fn generate(&self, envelope: &Envelope) -> anyhow::Result<String>;
}

/// Resolve the configured backend. Called exactly once at startup; the
/// returned backend handles every request for the life of the process.
pub fn build_backend(config: &CourierConfig) -> anyhow::Result<Arc<dyn Backend>> {
    match config.backend {
        BackendKind::Local => Ok(Arc::new(OllamaBackend::from_config(&config.ollama))),
        BackendKind::Hosted => Ok(Arc::new(GeminiBackend::from_config(&config.gemini)?)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn local_config_selects_ollama() {
        let config = CourierConfig::default();
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "ollama");
        assert!(backend.supports_vision());
    }

    #[test]
    fn hosted_config_selects_gemini() {
        let config = CourierConfig {
            backend: BackendKind::Hosted,
            gemini: courier_config::GeminiConfig {
                api_key: secrecy::Secret::new("k".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "gemini");
        assert!(!backend.supports_vision());
    }

    #[test]
    fn hosted_without_api_key_is_rejected() {
        let config = CourierConfig {
            backend: BackendKind::Hosted,
            ..Default::default()
        };
        assert!(build_backend(&config).is_err());
    }
}
