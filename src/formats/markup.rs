/// Remove `<...>` spans (style tags, voice spans, inline timing tags).
///
/// A `<` without a closing `>`, or an empty `<>`, is not a tag and is kept
/// as text. Spans are not nesting-aware: everything up to the first `>` goes.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => {
                rest = &after[close + 1..];
            }
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Caption payload to plain text.
pub fn sanitize(s: &str) -> String {
    normalize_ws(&strip_tags(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_style_tags() {
        assert_eq!(sanitize("<c>Hello</c> <i>world</i>"), "Hello world");
        assert_eq!(sanitize("<v Roger Bingham>We are here</v>"), "We are here");
    }

    #[test]
    fn strips_inline_timing_tags() {
        let raw = "so<00:00:01.240><c> this</c><00:00:01.520><c> is</c>";
        assert_eq!(sanitize(raw), "so this is");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize("Hello   \n  world"), "Hello world");
        assert_eq!(sanitize("  \t padded \r\n"), "padded");
    }

    #[test]
    fn keeps_unclosed_and_empty_brackets() {
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("x <> y"), "x <> y");
        assert_eq!(strip_tags("trailing <"), "trailing <");
    }

    #[test]
    fn nested_opener_consumed_to_first_close() {
        assert_eq!(strip_tags("a<b<c>>d"), "a>d");
        assert_eq!(strip_tags("<<i>>x"), ">x");
    }

    #[test]
    fn markup_only_becomes_empty() {
        assert_eq!(sanitize("<c></c> <i> </i>"), "");
    }
}
