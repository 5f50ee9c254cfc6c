//! HTML-escaping of raw mml input.
//!
//! Every body line passes through here before any tag substitution,
//! so author-supplied text can never smuggle markup into the output.

/// Escape HTML-significant characters and expand tabs.
///
/// `&` is handled together with the other escapes in a single pass,
/// so already-produced entities are never escaped twice. Tabs expand
/// to four spaces to keep code blocks readable in `<pre>` output.
pub fn sanitize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\t' => out.push_str("    "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_escapes() {
        assert_eq!(
            sanitize(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_sanitize_tab_expansion() {
        assert_eq!(sanitize("\tindented"), "    indented");
    }

    #[test]
    fn test_sanitize_ampersand_not_double_escaped() {
        assert_eq!(sanitize("a&b"), "a&amp;b");
        assert_eq!(sanitize("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_sanitize_plain_text_unchanged() {
        assert_eq!(sanitize("hello world"), "hello world");
        assert_eq!(sanitize(""), "");
    }
}
