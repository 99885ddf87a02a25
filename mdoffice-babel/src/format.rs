//! The reader/writer seam
//!
//! Every input and output format implements [`Format`]. Readers turn source text into
//! the block model, writers turn the block model into output. A format states which
//! side it is on through [`Format::role`]; the registry refuses calls that go the
//! wrong way before the format sees them.
//!
//! Writers take string options (`template`, `sheet_title`, `spans`). The keys a writer
//! understands are listed by [`Format::option_keys`] and anything else is rejected up
//! front, so a typo in a config key fails loudly instead of being ignored.

use crate::error::FormatError;
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Writer options, keyed by option name.
pub type RenderOptions = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRole {
    /// Source text → block model
    Reader,
    /// Block model → output
    Writer,
}

/// Output of a writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// UTF-8 text output (the block tree, JSON)
    Text(String),
    /// A zipped office package
    Binary(Vec<u8>),
}

impl Rendered {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Rendered::Text(text) => text.into_bytes(),
            Rendered::Binary(bytes) => bytes,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Rendered::Binary(_))
    }
}

/// A document format the converter can read or write.
///
/// # Examples
///
/// ```ignore
/// struct PlainText;
///
/// impl Format for PlainText {
///     fn name(&self) -> &str {
///         "text"
///     }
///
///     fn role(&self) -> FormatRole {
///         FormatRole::Reader
///     }
///
///     fn parse(&self, source: &str) -> Result<Document, FormatError> {
///         Ok(parse_markdown(source))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, also accepted by `--from`
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the leading dot, used to detect the input format of a file.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn role(&self) -> FormatRole;

    /// Option keys [`Format::render`] understands.
    fn option_keys(&self) -> &[&str] {
        &[]
    }

    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' cannot read input",
            self.name()
        )))
    }

    fn render(&self, _doc: &Document, _options: &RenderOptions) -> Result<Rendered, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' cannot write output",
            self.name()
        )))
    }
}

/// Fail on the first option the format does not list.
pub fn check_options(format: &dyn Format, options: &RenderOptions) -> Result<(), FormatError> {
    let known = format.option_keys();
    let mut keys: Vec<&String> = options.keys().collect();
    keys.sort();
    match keys.into_iter().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(FormatError::NotSupported(format!(
            "Format '{}' does not support option '{key}'",
            format.name()
        ))),
        None => Ok(()),
    }
}
