/// Replace `${ENV_VAR}` placeholders in the raw config text.
///
/// Unresolvable variables and malformed placeholders are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Implementation of [`substitute_env`] with a pluggable lookup, so tests
/// don't have to mutate the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            // "${}" or no closing brace: emit literally and stop scanning
            // this placeholder.
            _ => {
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "COURIER_TEST_TOKEN" => Some("123:abc".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("token = \"${COURIER_TEST_TOKEN}\"", lookup),
            "token = \"123:abc\""
        );
    }

    #[test]
    fn leaves_unknown_var_as_is() {
        assert_eq!(
            substitute_env_with("key = \"${NOPE_NOT_SET}\"", lookup),
            "key = \"${NOPE_NOT_SET}\""
        );
    }

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(
            substitute_env_with("model = \"qwen3-vl:2b\"", lookup),
            "model = \"qwen3-vl:2b\""
        );
    }

    #[test]
    fn handles_unclosed_placeholder() {
        assert_eq!(
            substitute_env_with("broken ${COURIER", lookup),
            "broken ${COURIER"
        );
    }

    #[test]
    fn multiple_placeholders_in_one_line() {
        assert_eq!(
            substitute_env_with("${COURIER_TEST_TOKEN}/${COURIER_TEST_TOKEN}", lookup),
            "123:abc/123:abc"
        );
    }
}
