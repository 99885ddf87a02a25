//! Format registry
//!
//! Looks formats up by name and by input file extension. Registration order is kept,
//! so extension detection is deterministic when two readers claim the same suffix.

use std::path::Path;

use crate::error::FormatError;
use crate::format::{check_options, Format, FormatRole, RenderOptions, Rendered};
use crate::ir::nodes::Document;

pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatRegistry {
            formats: Vec::new(),
        }
    }

    /// Register a format, replacing one registered under the same name in place.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let format: Box<dyn Format> = Box::new(format);
        match self
            .formats
            .iter_mut()
            .find(|existing| existing.name() == format.name())
        {
            Some(slot) => *slot = format,
            None => self.formats.push(format),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.iter().any(|f| f.name() == name)
    }

    /// Names of the formats playing `role`, sorted.
    pub fn names(&self, role: FormatRole) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .formats
            .iter()
            .filter(|f| f.role() == role)
            .map(|f| f.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// The reader registered for a file's extension, compared case-insensitively.
    pub fn detect_reader(&self, path: impl AsRef<Path>) -> Option<&str> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        self.formats
            .iter()
            .filter(|f| f.role() == FormatRole::Reader)
            .find(|f| f.file_extensions().contains(&extension.as_str()))
            .map(|f| f.name())
    }

    /// Read source text with the named reader.
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let reader = self.get(format)?;
        if reader.role() != FormatRole::Reader {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' is a writer and cannot read input"
            )));
        }
        reader.parse(source)
    }

    /// Render a document with the named writer.
    pub fn render(
        &self,
        doc: &Document,
        format: &str,
        options: &RenderOptions,
    ) -> Result<Rendered, FormatError> {
        let writer = self.get(format)?;
        if writer.role() != FormatRole::Writer {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' is a reader and cannot write output"
            )));
        }
        check_options(writer, options)?;
        writer.render(doc, options)
    }

    /// Render with a text writer and no options.
    pub fn render_text(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        match self.render(doc, format, &RenderOptions::new())? {
            Rendered::Text(text) => Ok(text),
            Rendered::Binary(_) => Err(FormatError::SerializationError(format!(
                "Format '{format}' writes a binary package, not text"
            ))),
        }
    }

    /// Readers first, then the office writers, then the inspection writers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::markdown::CommonMarkFormat);
        registry.register(crate::formats::html::HtmlFormat);

        registry.register(crate::formats::docx::DocxFormat::default());
        registry.register(crate::formats::xlsx::XlsxFormat::default());

        registry.register(crate::formats::treeviz::TreevizFormat);
        registry.register(crate::formats::json::JsonFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
