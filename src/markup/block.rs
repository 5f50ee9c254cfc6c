//! Block-level mml document conversion.
//!
//! A document is scanned line by line. A line whose prefix is one of
//! the block markers opens that block; the body runs until a line that
//! is exactly the same marker closes it. Lines outside any block are
//! dropped.

use super::{MarkupError, convert_inline, sanitize};

/// The four block forms of mml.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Paragraph,
    Code,
    Heading,
    List,
}

/// How a block treats its body lines.
enum BodyMode {
    /// Sanitize only, one line per output line. Used for code and
    /// headings where inline tags must stay literal.
    Verbatim,
    /// Sanitize, substitute inline tags, and wrap each line in the
    /// given element.
    Inline { item_tag: &'static str },
}

impl BlockKind {
    /// All kinds, in the order markers are tried against a line.
    const ALL: [Self; 4] = [Self::Paragraph, Self::Code, Self::Heading, Self::List];

    fn from_line(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| line.starts_with(kind.marker()))
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Paragraph => "{p}",
            Self::Code => "{c}",
            Self::Heading => "{h}",
            Self::List => "{l}",
        }
    }

    const fn open_tag(self) -> &'static str {
        match self {
            Self::Paragraph => "<p>",
            Self::Code => r#"<div class="code"><code><pre class="code-font">"#,
            Self::Heading => "<h3>",
            Self::List => "<ul>",
        }
    }

    const fn close_tag(self) -> &'static str {
        match self {
            Self::Paragraph => "</p>",
            Self::Code => "</pre></code></div>",
            Self::Heading => "</h3>",
            Self::List => "</ul>",
        }
    }

    const fn body_mode(self) -> BodyMode {
        match self {
            Self::Paragraph => BodyMode::Inline { item_tag: "p" },
            Self::List => BodyMode::Inline { item_tag: "li" },
            Self::Code | Self::Heading => BodyMode::Verbatim,
        }
    }
}

/// Convert a whole mml document to HTML.
///
/// Blocks never nest: once a marker opens a block, every following
/// line belongs to its body until the exact close marker. Reaching end
/// of input inside a block is an error, so a truncated document can
/// never be stored half-converted.
pub fn convert_document(input: &str) -> Result<String, MarkupError> {
    let mut lines = input.lines();
    let mut html = String::new();

    while let Some(line) = lines.next() {
        let Some(kind) = BlockKind::from_line(line) else {
            continue;
        };
        html.push_str(kind.open_tag());
        html.push('\n');
        convert_body(&mut lines, kind, &mut html)?;
        html.push_str(kind.close_tag());
        html.push('\n');
    }

    Ok(html)
}

/// Consume body lines up to the close marker, appending converted
/// output. The shared iterator keeps block scanning strictly in
/// document order.
fn convert_body(
    lines: &mut std::str::Lines<'_>,
    kind: BlockKind,
    html: &mut String,
) -> Result<(), MarkupError> {
    loop {
        let Some(line) = lines.next() else {
            return Err(MarkupError::MissingCloseTag {
                tag: kind.marker(),
            });
        };
        if line == kind.marker() {
            return Ok(());
        }

        let line = sanitize(line);
        match kind.body_mode() {
            BodyMode::Verbatim => {
                html.push_str(&line);
                html.push('\n');
            }
            BodyMode::Inline { item_tag } => {
                html.push('<');
                html.push_str(item_tag);
                html.push('>');
                html.push_str(&convert_inline(&line));
                html.push_str("</");
                html.push_str(item_tag);
                html.push_str(">\n");
            }
        }
    }
}
