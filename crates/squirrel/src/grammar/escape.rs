//! Escaping helpers shared by the grammar notation and the tree printers.

/// Escapes `s` for display inside a quoted literal.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

/// Escapes a single character for display inside a quoted literal.
#[must_use]
pub fn escape_char(c: char) -> String {
    let mut out = String::new();
    push_escaped(&mut out, c);
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        '\'' => out.push_str("\\'"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        c if (c as u32) <= 0x1f || (0x7f..=0xffff).contains(&(c as u32)) => {
            out.push_str(&format!("\\u{:04x}", c as u32));
        }
        c if (c as u32) > 0xffff => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
        c => out.push(c),
    }
}

const fn unescape_code(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        // `\\`, `\"`, `\'`, `\[`, `\]`, `\-` and unknown escapes all stand for themselves
        other => other,
    }
}

/// Resolves backslash escapes in the body of a string literal.
///
/// A trailing lone backslash is kept as-is.
#[must_use]
pub fn unescape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
        {
            out.push(unescape_code(next));
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolves a single, possibly escaped, character.
///
/// Returns `None` unless `s` is exactly one character or one escape sequence.
#[must_use]
pub fn unescape_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, _) => Some(c),
        (Some('\\'), Some(code), None) => Some(unescape_code(code)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_controls_and_quotes() {
        assert_eq!(escape_string("a\"b'\\\n\t"), "a\\\"b\\'\\\\\\n\\t");
        assert_eq!(escape_string("\u{1}"), "\\u0001");
        assert_eq!(escape_string("é"), "\\u00e9");
        assert_eq!(escape_string("😀"), "\\u{1f600}");
    }

    #[test]
    fn test_unescape_string() {
        assert_eq!(unescape_string(r"a\nb"), "a\nb");
        assert_eq!(unescape_string(r#"\"\]\-\q"#), "\"]-q");
        assert_eq!(unescape_string("x\\"), "x\\");
    }

    #[test]
    fn test_unescape_char() {
        assert_eq!(unescape_char("a"), Some('a'));
        assert_eq!(unescape_char(r"\t"), Some('\t'));
        assert_eq!(unescape_char(r"\'"), Some('\''));
        assert_eq!(unescape_char("ab"), None);
        assert_eq!(unescape_char(""), None);
    }
}
