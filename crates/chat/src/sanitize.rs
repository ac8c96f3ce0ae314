//! Output sanitizer: trims model output and collapses excess blank lines.
//!
//! Platform-specific escaping is deliberately not done here; adapters own
//! their markup rules.

/// Returned when the backend produced nothing displayable.
pub const EMPTY_FALLBACK: &str = "No response generated.";

/// Normalize raw model text for display.
///
/// Empty, absent, or whitespace-only input yields [`EMPTY_FALLBACK`], so
/// the result is always non-empty. Otherwise the text is trimmed and every
/// run of 3+ consecutive newlines is collapsed down to exactly 2.
/// Idempotent; non-whitespace content is never altered or truncated.
#[must_use]
pub fn polish(text: Option<&str>) -> String {
    let trimmed = text.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return EMPTY_FALLBACK.to_string();
    }

    let mut out = trimmed.to_string();
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_fall_back() {
        assert_eq!(polish(None), EMPTY_FALLBACK);
        assert_eq!(polish(Some("")), EMPTY_FALLBACK);
    }

    #[test]
    fn whitespace_only_falls_back() {
        assert_eq!(polish(Some("   \n\t ")), EMPTY_FALLBACK);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(polish(Some("  x  ")), "x");
    }

    #[test]
    fn collapses_newline_runs_to_two() {
        assert_eq!(polish(Some("a\n\n\n\nb")), "a\n\nb");
        assert_eq!(polish(Some("a\n\n\n\n\n\n\nb")), "a\n\nb");
    }

    #[test]
    fn preserves_single_and_double_newlines() {
        assert_eq!(polish(Some("a\nb\n\nc")), "a\nb\n\nc");
    }

    #[test]
    fn is_idempotent() {
        for input in ["a\n\n\n\nb", "  x  ", "clean text", "a\n\n\n\n\nb\n\n\nc"] {
            let once = polish(Some(input));
            assert_eq!(polish(Some(&once)), once, "not a fixed point: {input:?}");
        }
    }

    #[test]
    fn leaves_clean_text_unchanged() {
        assert_eq!(polish(Some("The text says X.")), "The text says X.");
    }
}
