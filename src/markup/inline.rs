//! Inline mml tag substitution.
//!
//! Runs on sanitized lines inside paragraph and list bodies. Each tag
//! is applied at most once per line, in a fixed order; a line like
//! `{b}one{b} and {b}two{b}` bolds only the first span.

use regex::Regex;
use std::sync::LazyLock;

// Tag bodies exclude braces so a malformed tag can never swallow the
// opening of the next one.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{l\|([^{}]+)\}([^{}]+)\{l\}").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{im\|([^{}]+)\}([^{}]+)\{im\}").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{i\}([^{}]+)\{i\}").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{b\}([^{}]+)\{b\}").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{ic\}([^{}]+)\{ic\}").unwrap());

/// Substitute inline tags in a single sanitized line.
///
/// Order matters: links before images before the plain style tags,
/// so `{l|...}` is never misread as an italic `{i}` fragment.
pub fn convert_inline(line: &str) -> String {
    let line = LINK_RE.replace(line, r#"<a href="${1}">${2}</a>"#);
    let line = IMAGE_RE.replace(&line, r#"<img src="${1}" alt="${2}" />"#);
    let line = ITALIC_RE.replace(&line, "<i>${1}</i>");
    let line = BOLD_RE.replace(&line, "<b>${1}</b>");
    let line = CODE_RE.replace(&line, r#"<span class="inline-code">${1}</span>"#);
    line.into_owned()
}
