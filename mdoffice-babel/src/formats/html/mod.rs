//! HTML reader
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for parsing: a browser-grade HTML5
//! parser that recovers from malformed markup the way browsers do, so caller HTML never
//! needs to be well formed relative to the subset we read.
//!
//! # Element Mapping Table
//!
//! | HTML                                   | Block model                         |
//! |----------------------------------------|-------------------------------------|
//! | `h1`..`h6`                             | Heading (level from tag)            |
//! | `p`                                    | Paragraph                           |
//! | `ul` / `ol` (nested inside `li`)       | List, nested lists at level + 1     |
//! | `table` (`tr` / `th` / `td`)           | Table, `text-align` per cell        |
//! | `blockquote`                           | Quote                               |
//! | `pre`                                  | Paragraph of code lines             |
//! | `hr`                                   | Rule                                |
//! | `div`, `section`, `article`, `main`    | walked through                      |
//! | Inline: `strong`/`b`, `em`/`i`, `code` | Bold, Italic, Code                  |
//! | Inline: `a href`, `br`                 | Link, Break                         |
//!
//! Everything else is skipped without error.

mod dom;
pub mod parser;
pub mod table;

use crate::error::FormatError;
use crate::format::{Format, FormatRole};
use crate::ir::nodes::Document;

pub use parser::{parse_html, parse_html_str};
pub use table::extract_html_table;

/// Format implementation for HTML input
#[derive(Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML subset (headings, paragraphs, lists, tables)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Reader
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_html_str(source)
    }
}
