use std::path::{Path, PathBuf};

/// Substituted for the user part when an image arrives without a caption.
pub const DEFAULT_IMAGE_PROMPT: &str = "Analyze this image.";

/// Normalized request passed from the dispatcher to a backend.
///
/// Created once per inbound message, consumed once, then discarded. Only
/// contains what a backend needs to produce a completion — platform
/// metadata (chat ids, message ids, sender names) can never leak into
/// backend API requests.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Fixed per-deployment system instruction.
    pub system: String,
    /// Caller-supplied text, if any.
    pub user_text: Option<String>,
    /// Already-downloaded local image file, if any. The core never fetches
    /// remote resources itself.
    pub image: Option<PathBuf>,
}

impl Envelope {
    pub fn new(
        system: impl Into<String>,
        user_text: Option<String>,
        image: Option<PathBuf>,
    ) -> Self {
        Self {
            system: system.into(),
            user_text,
            image,
        }
    }

    /// The text of the user part.
    ///
    /// Defaults to [`DEFAULT_IMAGE_PROMPT`] when no text was supplied but an
    /// image is attached; with neither present the backend is invoked with
    /// an empty user part.
    #[must_use]
    pub fn user_part(&self) -> &str {
        match (&self.user_text, &self.image) {
            (Some(text), _) => text,
            (None, Some(_)) => DEFAULT_IMAGE_PROMPT,
            (None, None) => "",
        }
    }

    #[must_use]
    pub fn image_path(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// One-line request summary for log events (never the full prompt).
    #[must_use]
    pub fn summary(&self) -> String {
        let text = self.user_part();
        let head: String = text.chars().take(80).collect();
        let ellipsis = if text.chars().count() > 80 { "…" } else { "" };
        match &self.image {
            Some(path) => format!("text: {head:?}{ellipsis}, image: {}", path.display()),
            None => format!("text: {head:?}{ellipsis}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn user_part_passes_text_through() {
        let env = Envelope::new("sys", Some("Summarize this.".into()), None);
        assert_eq!(env.user_part(), "Summarize this.");
    }

    #[test]
    fn user_part_defaults_for_uncaptioned_image() {
        let env = Envelope::new("sys", None, Some(PathBuf::from("data/image_1.jpg")));
        assert_eq!(env.user_part(), DEFAULT_IMAGE_PROMPT);
    }

    #[test]
    fn user_part_empty_when_nothing_supplied() {
        let env = Envelope::new("sys", None, None);
        assert_eq!(env.user_part(), "");
    }

    #[test]
    fn caption_wins_over_default_prompt() {
        let env = Envelope::new(
            "sys",
            Some("What breed is this?".into()),
            Some(PathBuf::from("data/image_2.jpg")),
        );
        assert_eq!(env.user_part(), "What breed is this?");
    }

    #[test]
    fn summary_truncates_long_text() {
        let long = "x".repeat(200);
        let env = Envelope::new("sys", Some(long), None);
        let summary = env.summary();
        assert!(summary.contains('…'));
        assert!(summary.len() < 120);
    }
}
