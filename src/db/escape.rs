//! Manual string escaping for backends that interpolate rather than bind.
//!
//! Mirrors `mysql_real_escape_string`: the characters MySQL treats
//! specially inside quoted literals are backslash-escaped. The prepared
//! backend never needs this — its `sanitize` is a passthrough — but the
//! buffered and legacy backends interpolate text directly.

/// Escape a value for interpolation into a quoted MySQL string literal.
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_string("credit_card"), "credit_card");
    }

    #[test]
    fn test_quotes_escaped() {
        assert_eq!(escape_string(r#"o'brien"#), r#"o\'brien"#);
        assert_eq!(escape_string(r#"a"b"#), r#"a\"b"#);
    }

    #[test]
    fn test_backslash_escaped_before_reuse() {
        assert_eq!(escape_string(r"a\b"), r"a\\b");
        // An already-escaped quote must not collapse back into a raw quote
        assert_eq!(escape_string(r"\'"), r"\\\'");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_string("a\nb\rc\0d\x1ae"), r"a\nb\rc\0d\Ze");
    }

    #[test]
    fn test_unicode_passthrough() {
        assert_eq!(escape_string("naïve café"), "naïve café");
    }
}
