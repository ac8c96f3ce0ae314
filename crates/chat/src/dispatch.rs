//! Backend dispatcher: envelope construction and backend invocation.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use {
    courier_config::CourierConfig,
    courier_providers::{Backend, Envelope, DEFAULT_IMAGE_PROMPT},
};

/// Built-in system instruction, used unless the config overrides it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a multimodal assistant relaying messages for a chat bridge.

CORE RULE (HIGHEST PRIORITY):
Always do EXACTLY what the user asks.

Do NOT reinterpret the task.
Do NOT convert tasks into explanations unless asked.
Do NOT add promotional or descriptive content unless requested.

Execute the task precisely.";

/// Routes every request to the one backend selected at startup.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    system_prompt: String,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, config: &CourierConfig) -> Self {
        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        Self {
            backend,
            system_prompt,
        }
    }

    /// Normalize caller input into an [`Envelope`].
    ///
    /// An image attached for a backend without vision support is dropped
    /// with a warning; the text path still runs, and an uncaptioned image
    /// keeps its default user part so the backend never sees an empty
    /// prompt.
    pub fn build_envelope(&self, user_text: Option<&str>, image: Option<&Path>) -> Envelope {
        let mut user_text = user_text.map(str::to_string);
        let image = match image {
            Some(path) if !self.backend.supports_vision() => {
                warn!(
                    backend = self.backend.name(),
                    path = %path.display(),
                    "backend does not support images, dropping attachment"
                );
                if user_text.is_none() {
                    user_text = Some(DEFAULT_IMAGE_PROMPT.to_string());
                }
                None
            },
            other => other.map(PathBuf::from),
        };
        Envelope::new(self.system_prompt.clone(), user_text, image)
    }

    /// Invoke the backend with the normalized request.
    ///
    /// Returns the raw completion (possibly empty, never panics); errors
    /// propagate to the runtime boundary above, which owns degradation.
    pub async fn dispatch(
        &self,
        user_text: Option<&str>,
        image: Option<&Path>,
    ) -> anyhow::Result<String> {
        let envelope = self.build_envelope(user_text, image);

        info!(
            backend = self.backend.name(),
            model = self.backend.model(),
            request = %envelope.summary(),
            "llm request"
        );

        let output = self.backend.generate(&envelope).await?;

        info!(
            backend = self.backend.name(),
            chars = output.len(),
            "llm response"
        );
        Ok(output)
    }
}
