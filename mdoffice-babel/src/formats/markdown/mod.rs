//! Markdown dialect reader
//!
//! Two flavours share the same block model:
//!
//! | Flavour      | Reader                                        | Notes                                  |
//! |--------------|-----------------------------------------------|----------------------------------------|
//! | `markdown`   | line parser ([`blocks`]) + [`inline`] spans   | 3-space list nesting, hard-break units |
//! | `commonmark` | `comrak` to HTML, then the HTML tree adapter  | standard CommonMark + GFM tables       |
//!
//! The line parser is the default. It keeps the dialect's quirks that matter for
//! office output: `n` blank lines keep `n - 1` empty paragraphs, lines ending in
//! two spaces glue into one paragraph with explicit breaks, and list nesting is
//! derived from indentation rather than from the marker column.

pub mod blocks;
pub mod inline;

use comrak::{markdown_to_html, ComrakOptions};

use crate::error::FormatError;
use crate::format::{Format, FormatRole};
use crate::formats::html::parse_html_str;
use crate::ir::nodes::Document;

pub use blocks::parse_blocks;
pub use inline::parse_inline;

/// Parse markdown dialect text into a document.
pub fn parse_markdown(source: &str) -> Document {
    let lines: Vec<&str> = source.lines().collect();
    Document::new(parse_blocks(&lines))
}

/// Parse markdown through `comrak`, then read the rendered HTML.
pub fn parse_commonmark(source: &str) -> Result<Document, FormatError> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    let html = markdown_to_html(source, &options);
    parse_html_str(&html)
}

/// Format implementation for the markdown dialect
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown dialect (3-space list nesting, pipe tables)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Reader
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_markdown(source))
    }
}

/// Format implementation for CommonMark, read via `comrak`
pub struct CommonMarkFormat;

impl Format for CommonMarkFormat {
    fn name(&self) -> &str {
        "commonmark"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown read through comrak"
    }

    fn file_extensions(&self) -> &[&str] {
        &["cmark"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Reader
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_commonmark(source)
    }
}
