//! Local backend: Ollama's `/api/chat` endpoint.

use {
    anyhow::Context,
    async_trait::async_trait,
    base64::Engine,
    serde::Deserialize,
    tracing::{debug, info},
};

use courier_config::OllamaConfig;

use crate::{envelope::Envelope, shared_http_client, Backend};

/// Backend for a locally hosted Ollama runtime.
pub struct OllamaBackend {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: shared_http_client().clone(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }
}

/// `/api/chat` request body.
///
/// `stream: false` — the whole completion arrives in a single response
/// object rather than as NDJSON chunks.
fn chat_request_body(
    model: &str,
    envelope: &Envelope,
    image_b64: Option<String>,
) -> serde_json::Value {
    let mut user = serde_json::json!({
        "role": "user",
        "content": envelope.user_part(),
    });
    if let Some(data) = image_b64 {
        user["images"] = serde_json::json!([data]);
    }
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": envelope.system },
            user,
        ],
        "stream": false,
    })
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: ChatMessage,
}

#[derive(Deserialize, Default)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Extract the completion text, coercing a missing field to `""`.
fn parse_chat_response(body: serde_json::Value) -> String {
    serde_json::from_value::<ChatResponse>(body)
        .map(|r| r.message.content)
        .unwrap_or_default()
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_vision(&self) -> bool {
        true
    }

    async fn generate(&self, envelope: &Envelope) -> anyhow::Result<String> {
        let image_b64 = match envelope.image_path() {
            Some(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("read image {}", path.display()))?;
                debug!(path = %path.display(), bytes = bytes.len(), "attaching image");
                Some(base64::engine::general_purpose::STANDARD.encode(bytes))
            },
            None => None,
        };

        let body = chat_request_body(&self.model, envelope, image_b64);
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?
            .error_for_status()
            .context("ollama returned an error status")?;

        let value: serde_json::Value =
            response.json().await.context("ollama response not JSON")?;
        let output = parse_chat_response(value);
        info!(model = %self.model, chars = output.len(), "ollama completion received");
        Ok(output)
    }
}
