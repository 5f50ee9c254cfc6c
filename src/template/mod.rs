//! Marker-based HTML template engine.
//!
//! A template is an ordinary HTML file containing marker comments such
//! as `<!--post-->`. Callers select a marker with [`HtmlTemplate::set_insert`],
//! queue content under it with the builder methods, and finally
//! [`HtmlTemplate::render`] streams the template through, replacing each
//! marker line with its queued content.
//!
//! Container elements ([`HtmlTemplate::div`], [`HtmlTemplate::li`]) open a
//! frame: subsequent appends land inside it until [`HtmlTemplate::jump`]
//! climbs back out. Frames nest arbitrarily deep.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to open template `{path}`")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read template line")]
    Read(#[from] std::io::Error),
    #[error("no active insertion marker; call set_insert first")]
    NoActiveMarker,
}

/// One queued entry under a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// A finished line, emitted as-is.
    Literal(String),
    /// An open container: children render between `open` and `close`.
    Frame {
        open: String,
        close: String,
        children: Vec<Item>,
    },
}

/// Insertion buffer for one marker.
#[derive(Debug)]
struct Insert {
    marker: String,
    items: Vec<Item>,
}

#[derive(Debug)]
pub struct HtmlTemplate {
    reader: BufReader<File>,
    /// Buffers in the order markers were first selected.
    inserts: Vec<Insert>,
    /// Index into `inserts` of the marker appends currently target.
    current: Option<usize>,
    /// Child indices of the open frames, outermost first. Empty means
    /// appends land at the marker's top level.
    depth: Vec<usize>,
}

impl HtmlTemplate {
    pub fn open(path: &Path) -> Result<Self, TemplateError> {
        let file = File::open(path).map_err(|source| TemplateError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            inserts: Vec::new(),
            current: None,
            depth: Vec::new(),
        })
    }

    /// Select the marker subsequent appends target, creating its buffer
    /// on first use. Resets the frame cursor to the top level.
    pub fn set_insert(&mut self, marker: &str) {
        let index = match self.inserts.iter().position(|i| i.marker == marker) {
            Some(index) => index,
            None => {
                self.inserts.push(Insert {
                    marker: marker.to_string(),
                    items: Vec::new(),
                });
                self.inserts.len() - 1
            }
        };
        self.current = Some(index);
        self.depth.clear();
    }

    /// Climb `levels` frames toward the top level. Zero climbs all the
    /// way out.
    pub fn jump(&mut self, levels: usize) {
        if levels == 0 {
            self.depth.clear();
        } else {
            let keep = self.depth.len().saturating_sub(levels);
            self.depth.truncate(keep);
        }
    }

    /// Append a heading at the default level.
    pub fn h(&mut self, text: &str) -> Result<(), TemplateError> {
        self.h_level(text, 2)
    }

    pub fn h_level(&mut self, text: &str, level: u8) -> Result<(), TemplateError> {
        self.append(Item::Literal(format!("<h{level}>{text}</h{level}>")))
    }

    pub fn hr(&mut self) -> Result<(), TemplateError> {
        self.append(Item::Literal("<hr>".to_string()))
    }

    pub fn p(&mut self, text: &str) -> Result<(), TemplateError> {
        self.append(Item::Literal(format!("<p>{text}</p>")))
    }

    pub fn a(&mut self, href: &str, text: &str) -> Result<(), TemplateError> {
        self.append(Item::Literal(format!(r#"<a href="{href}">{text}</a>"#)))
    }

    /// Append pre-rendered HTML without any wrapping.
    pub fn append_raw(&mut self, html: &str) -> Result<(), TemplateError> {
        self.append(Item::Literal(html.to_string()))
    }

    /// Open a `<li>` container; appends nest inside until a jump.
    pub fn li(&mut self) -> Result<(), TemplateError> {
        self.append(Item::Frame {
            open: "<li>".to_string(),
            close: "</li>".to_string(),
            children: Vec::new(),
        })
    }

    /// Open a `<div id="...">` container; appends nest inside until a
    /// jump.
    pub fn div(&mut self, id: &str) -> Result<(), TemplateError> {
        self.append(Item::Frame {
            open: format!(r#"<div id="{id}">"#),
            close: "</div>".to_string(),
            children: Vec::new(),
        })
    }

    fn append(&mut self, item: Item) -> Result<(), TemplateError> {
        let slot = self.current.ok_or(TemplateError::NoActiveMarker)?;
        let is_frame = matches!(item, Item::Frame { .. });

        let mut target = &mut self.inserts[slot].items;
        for &index in &self.depth {
            let Item::Frame { children, .. } = &mut target[index] else {
                // depth only ever records indices of frames we pushed
                unreachable!("frame cursor points at a literal");
            };
            target = children;
        }
        target.push(item);
        if is_frame {
            self.depth.push(target.len() - 1);
        }
        Ok(())
    }

    /// Stream the template through, replacing each line that contains a
    /// known marker with that marker's queued content. The whole page is
    /// built in memory so a late failure never emits a torn document.
    pub fn render(self) -> Result<String, TemplateError> {
        let Self {
            reader, inserts, ..
        } = self;
        let mut out = String::new();
        for line in reader.lines() {
            let line = line?;
            match inserts.iter().find(|i| line.contains(&i.marker)) {
                Some(insert) => flatten(&insert.items, &mut out),
                None => {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }
}

/// Depth-first emission, one item per output line. Open frames close
/// implicitly.
fn flatten(items: &[Item], out: &mut String) {
    for item in items {
        match item {
            Item::Literal(line) => {
                out.push_str(line);
                out.push('\n');
            }
            Item::Frame {
                open,
                close,
                children,
            } => {
                out.push_str(open);
                out.push('\n');
                flatten(children, out);
                out.push_str(close);
                out.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn template_with(content: &str) -> (NamedTempFile, HtmlTemplate) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let template = HtmlTemplate::open(file.path()).unwrap();
        (file, template)
    }

    #[test]
    fn test_marker_line_replaced() {
        let (_file, mut temp) = template_with("<body>\n<!--post-->\n</body>\n");
        temp.set_insert("<!--post-->");
        temp.h("Title").unwrap();
        temp.p("text").unwrap();
        assert_eq!(
            temp.render().unwrap(),
            "<body>\n<h2>Title</h2>\n<p>text</p>\n</body>\n"
        );
    }

    #[test]
    fn test_marker_matches_as_substring() {
        let (_file, mut temp) = template_with("  <!--post--> trailing\n");
        temp.set_insert("<!--post-->");
        temp.hr().unwrap();
        assert_eq!(temp.render().unwrap(), "<hr>\n");
    }

    #[test]
    fn test_unused_marker_line_kept() {
        let (_file, mut temp) = template_with("<!--links-->\n");
        temp.set_insert("<!--post-->");
        temp.p("x").unwrap();
        assert_eq!(temp.render().unwrap(), "<!--links-->\n");
    }

    #[test]
    fn test_empty_buffer_erases_marker_line() {
        let (_file, mut temp) = template_with("a\n<!--post-->\nb\n");
        temp.set_insert("<!--post-->");
        assert_eq!(temp.render().unwrap(), "a\nb\n");
    }

    #[test]
    fn test_nested_frames_and_jump() {
        let (_file, mut temp) = template_with("<!--m-->\n");
        temp.set_insert("<!--m-->");
        temp.div("a").unwrap();
        temp.li().unwrap();
        temp.append_raw("x").unwrap();
        temp.jump(1);
        temp.append_raw("y").unwrap();
        assert_eq!(
            temp.render().unwrap(),
            "<div id=\"a\">\n<li>\nx\n</li>\ny\n</div>\n"
        );
    }

    #[test]
    fn test_jump_zero_returns_to_top_level() {
        let (_file, mut temp) = template_with("<!--m-->\n");
        temp.set_insert("<!--m-->");
        temp.div("a").unwrap();
        temp.div("b").unwrap();
        temp.jump(0);
        temp.hr().unwrap();
        assert_eq!(
            temp.render().unwrap(),
            "<div id=\"a\">\n<div id=\"b\">\n</div>\n</div>\n<hr>\n"
        );
    }

    #[test]
    fn test_jump_past_top_is_clamped() {
        let (_file, mut temp) = template_with("<!--m-->\n");
        temp.set_insert("<!--m-->");
        temp.li().unwrap();
        temp.jump(5);
        temp.p("after").unwrap();
        assert_eq!(temp.render().unwrap(), "<li>\n</li>\n<p>after</p>\n");
    }

    #[test]
    fn test_set_insert_resets_frame_cursor() {
        let (_file, mut temp) = template_with("<!--a-->\n<!--b-->\n");
        temp.set_insert("<!--a-->");
        temp.div("x").unwrap();
        temp.set_insert("<!--b-->");
        temp.p("top").unwrap();
        temp.set_insert("<!--a-->");
        temp.p("also top").unwrap();
        assert_eq!(
            temp.render().unwrap(),
            "<div id=\"x\">\n</div>\n<p>also top</p>\n<p>top</p>\n"
        );
    }

    #[test]
    fn test_append_without_marker_fails() {
        let (_file, mut temp) = template_with("x\n");
        assert!(matches!(
            temp.p("y").unwrap_err(),
            TemplateError::NoActiveMarker
        ));
    }

    #[test]
    fn test_open_missing_template() {
        let err = HtmlTemplate::open(Path::new("/nonexistent/t.html")).unwrap_err();
        assert!(matches!(err, TemplateError::Open { .. }));
    }
}
