//! Safe async boundary between platform adapters and the dispatcher.
//!
//! Adapters run a single cooperative event loop; the backend call is
//! offloaded to its own task so the loop only suspends while awaiting the
//! result. Failures never cross this boundary — callers always receive a
//! displayable string.

use std::{path::PathBuf, sync::Arc};

use {
    tokio::sync::Semaphore,
    tracing::{debug, error},
};

use crate::{dispatch::Dispatcher, sanitize::polish};

/// Fixed user-facing reply for any generation failure. Diagnostic detail
/// goes to the log, never to the user.
pub const GENERATION_ERROR_REPLY: &str = "Error generating response.";

/// Shared per-process pipeline handle, cloned into every adapter.
#[derive(Clone)]
pub struct ChatRuntime {
    dispatcher: Arc<Dispatcher>,
    permits: Arc<Semaphore>,
}

impl ChatRuntime {
    /// `max_concurrent` bounds in-flight backend calls across all adapters.
    pub fn new(dispatcher: Dispatcher, max_concurrent: usize) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Run the full pipeline for one inbound message and return display
    /// text.
    ///
    /// Never panics and never returns an error: backend failures are logged
    /// with their full chain and surfaced as [`GENERATION_ERROR_REPLY`].
    /// No retries, no timeouts, no cancellation once dispatched.
    pub async fn run_llm(&self, user_text: Option<String>, image: Option<PathBuf>) -> String {
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                // Semaphore is never closed; reachable only during shutdown.
                error!("llm worker pool closed");
                return GENERATION_ERROR_REPLY.to_string();
            },
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let handle = tokio::spawn(async move {
            let _permit = permit;
            dispatcher
                .dispatch(user_text.as_deref(), image.as_deref())
                .await
        });

        match handle.await {
            Ok(Ok(raw)) => {
                let polished = polish(Some(&raw));
                debug!(chars = polished.len(), "final output");
                polished
            },
            Ok(Err(e)) => {
                error!(error = %format!("{e:#}"), "llm generation failed");
                GENERATION_ERROR_REPLY.to_string()
            },
            Err(e) => {
                error!(error = %e, "llm task failed to complete");
                GENERATION_ERROR_REPLY.to_string()
            },
        }
    }
}
