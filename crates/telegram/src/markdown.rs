//! MarkdownV2 escaping for outbound messages.

/// Characters Telegram reserves in MarkdownV2 text.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Backslash-escape every MarkdownV2-reserved character.
///
/// Applied to the whole sanitized reply before a formatted send; if
/// Telegram still rejects the result, the outbound layer retries as plain
/// text.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("hello world", "hello world")]
    #[case("a.b", "a\\.b")]
    #[case("*bold*", "\\*bold\\*")]
    #[case("_x_ [y](z)", "\\_x\\_ \\[y\\]\\(z\\)")]
    #[case("1+1=2!", "1\\+1\\=2\\!")]
    #[case("`code` ~strike~ >quote", "\\`code\\` \\~strike\\~ \\>quote")]
    #[case("#tag |pipe| {brace}", "\\#tag \\|pipe\\| \\{brace\\}")]
    fn escapes_reserved_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_markdown(input), expected);
    }

    #[test]
    fn leaves_unicode_alone() {
        assert_eq!(escape_markdown("héllo 你好 🚀"), "héllo 你好 🚀");
    }

    #[test]
    fn newlines_pass_through() {
        assert_eq!(escape_markdown("a\n\nb"), "a\n\nb");
    }
}
