//! Hosted backend: the Gemini `generateContent` API.
//!
//! Text-only by design: the hosted path sends the system instruction
//! concatenated as a prefix to the user text and declares no vision
//! support. Image capability is a per-backend flag, not implied by the
//! backend contract.

use {
    anyhow::Context,
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::info,
};

use courier_config::GeminiConfig;

use crate::{envelope::Envelope, shared_http_client, Backend};

/// Backend for a hosted generation API.
pub struct GeminiBackend {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(
        api_key: Secret<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: shared_http_client().clone(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> anyhow::Result<Self> {
        if config.api_key.expose_secret().is_empty() {
            anyhow::bail!("hosted backend selected but gemini.api_key is not set");
        }
        Ok(Self::new(
            config.api_key.clone(),
            &config.model,
            &config.base_url,
        ))
    }
}

/// Single concatenated prompt: system instruction prefixed to the user part.
fn compose_prompt(envelope: &Envelope) -> String {
    format!("{}\n\nUser:\n{}", envelope.system, envelope.user_part())
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Extract the first candidate's text, coercing anything missing to `""`.
fn parse_generate_response(body: serde_json::Value) -> String {
    serde_json::from_value::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.candidates.into_iter().next())
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .unwrap_or_default()
}

#[async_trait]
impl Backend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, envelope: &Envelope) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": compose_prompt(envelope) }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?
            .error_for_status()
            .context("gemini returned an error status")?;

        let value: serde_json::Value =
            response.json().await.context("gemini response not JSON")?;
        let output = parse_generate_response(value);
        info!(model = %self.model, chars = output.len(), "gemini completion received");
        Ok(output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_backend(base_url: &str) -> GeminiBackend {
        GeminiBackend::new(Secret::new("test-key".into()), "gemini-1.5-flash", base_url)
    }

    #[test]
    fn prompt_concatenates_system_and_user() {
        let envelope = Envelope::new("Be precise.", Some("Summarize this.".into()), None);
        assert_eq!(
            compose_prompt(&envelope),
            "Be precise.\n\nUser:\nSummarize this."
        );
    }

    #[test]
    fn parse_extracts_first_candidate_text() {
        let body = serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "The text says X." }] } },
                { "content": { "parts": [{ "text": "second candidate" }] } },
            ],
        });
        assert_eq!(parse_generate_response(body), "The text says X.");
    }

    #[test]
    fn parse_coerces_missing_candidates_to_empty() {
        assert_eq!(parse_generate_response(serde_json::json!({})), "");
        assert_eq!(
            parse_generate_response(serde_json::json!({ "candidates": [] })),
            ""
        );
        assert_eq!(
            parse_generate_response(serde_json::json!({
                "candidates": [{ "content": { "parts": [] } }]
            })),
            ""
        );
    }

    #[test]
    fn vision_is_not_supported() {
        let backend = test_backend("http://localhost");
        assert!(!backend.supports_vision());
    }

    #[tokio::test]
    async fn generate_round_trip_against_fake_server() {
        use axum::{extract::Path, routing::post, Json, Router};

        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(
                |Path(model): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(model, "gemini-1.5-flash:generateContent");
                    let text = body["contents"][0]["parts"][0]["text"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    assert!(text.starts_with("Be precise."));
                    assert!(text.ends_with("User:\nSummarize this."));
                    Json(serde_json::json!({
                        "candidates": [
                            { "content": { "parts": [{ "text": "Done." }] } }
                        ],
                    }))
                },
            ),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let backend = test_backend(&format!("http://{addr}"));
        let envelope = Envelope::new("Be precise.", Some("Summarize this.".into()), None);
        assert_eq!(backend.generate(&envelope).await.unwrap(), "Done.");
    }
}
