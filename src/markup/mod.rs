//! mml markup conversion.
//!
//! mml is a deliberately small line-oriented markup language. A document
//! is a sequence of blocks delimited by `{p}`, `{c}`, `{h}` and `{l}`
//! markers, with a handful of inline tags inside paragraph and list
//! bodies. Conversion happens once at authoring time; the store only
//! ever holds finished HTML.
//!
//! # Module Structure
//!
//! - [`sanitize`]: HTML-escaping of raw input lines
//! - [`inline`]: inline tag substitution (`{l|url}`, `{b}`, ...)
//! - [`block`]: block scanning and document conversion

mod block;
mod inline;
mod sanitize;

pub use block::convert_document;
pub use inline::convert_inline;
pub use sanitize::sanitize;

use thiserror::Error;

/// Errors produced while converting an mml document.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// A block marker was opened but the document ended before the
    /// matching close marker appeared on its own line.
    #[error("could not find corresponding close tag to {tag}")]
    MissingCloseTag { tag: &'static str },
}
