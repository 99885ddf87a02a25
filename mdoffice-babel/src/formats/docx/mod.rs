//! DOCX writer
//!
//! Renders the block model into a WordprocessingML package. The XML is written by hand
//! into strings and zipped with [`crate::common::package::Package`].
//!
//! # Element Mapping Table
//!
//! | Block            | Word                                                         |
//! |------------------|--------------------------------------------------------------|
//! | Heading          | paragraph styled `Heading1`..`Heading6`                      |
//! | Paragraph        | paragraph, `Break` spans become `<w:br/>` in the same paragraph |
//! | Quote            | paragraph styled `Quote`                                     |
//! | List             | one paragraph per item, `ListBullet`/`ListNumber` (2, 3) by level |
//! | Table            | `TableGrid` table, widest row decides the column count       |
//! | Rule             | empty paragraph with a bottom border                         |
//! | Link             | external hyperlink relationship, blue and underlined         |
//!
//! Every ordered list gets its own numbering instance, so separate lists restart at 1.
//!
//! # Templates
//!
//! A template `.docx` contributes its `word/styles.xml`. If the template cannot be read
//! the built-in styles are used and a warning is logged.

pub mod parts;
pub mod renderer;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::common::package::{app_properties_xml, core_properties_xml, read_part, Package};
use crate::error::FormatError;
use crate::format::{Format, FormatRole, RenderOptions, Rendered};
use crate::ir::nodes::{plain_text, Block, Document};

use self::parts::{document_rels_xml, numbering_xml, CONTENT_TYPES_XML, DEFAULT_STYLES_XML, ROOT_RELS_XML};
use self::renderer::DocxRenderer;

/// Render a document into DOCX bytes.
///
/// `template` is the content of an existing `.docx`; its styles replace the built-in
/// ones when they can be read.
pub fn render_docx(doc: &Document, template: Option<&[u8]>) -> Result<Vec<u8>, FormatError> {
    let body = DocxRenderer::new().render(doc)?;

    let styles = match template.map(template_styles) {
        Some(Ok(styles)) => styles,
        Some(Err(e)) => {
            warn!(error = %e, "docx template unusable, using built-in styles");
            DEFAULT_STYLES_XML.to_string()
        }
        None => DEFAULT_STYLES_XML.to_string(),
    };

    let mut package = Package::new();
    package.add("[Content_Types].xml", CONTENT_TYPES_XML);
    package.add("_rels/.rels", ROOT_RELS_XML);
    package.add("word/document.xml", body.document_xml);
    package.add(
        "word/_rels/document.xml.rels",
        document_rels_xml(&body.hyperlinks)?,
    );
    package.add("word/styles.xml", styles);
    package.add("word/numbering.xml", numbering_xml(&body.numbering)?);
    package.add("docProps/core.xml", core_properties_xml(&document_title(doc), Utc::now()));
    package.add("docProps/app.xml", app_properties_xml("mdoffice"));
    package.finish()
}

/// Read a template file and render with it, falling back to built-in styles.
pub fn render_docx_with_template_path(
    doc: &Document,
    template: Option<&Path>,
) -> Result<Vec<u8>, FormatError> {
    let bytes = match template.map(std::fs::read) {
        Some(Ok(bytes)) => Some(bytes),
        Some(Err(e)) => {
            warn!(error = %e, "docx template could not be read, using built-in styles");
            None
        }
        None => None,
    };
    render_docx(doc, bytes.as_deref())
}

fn template_styles(bytes: &[u8]) -> Result<String, FormatError> {
    let styles = read_part(bytes, "word/styles.xml")?.ok_or_else(|| {
        FormatError::InvalidInput("template has no word/styles.xml".to_string())
    })?;
    String::from_utf8(styles)
        .map_err(|e| FormatError::InvalidInput(format!("template styles are not UTF-8: {e}")))
}

/// First heading's text, used for the package title.
fn document_title(doc: &Document) -> String {
    doc.blocks
        .iter()
        .find_map(|block| match block {
            Block::Heading(h) => Some(plain_text(&h.content)),
            _ => None,
        })
        .unwrap_or_default()
}

/// Format implementation for DOCX output
#[derive(Debug, Default)]
pub struct DocxFormat {
    template: Option<PathBuf>,
}

impl DocxFormat {
    pub fn with_template(template: impl Into<PathBuf>) -> Self {
        Self {
            template: Some(template.into()),
        }
    }
}

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Word document (Office Open XML)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Writer
    }

    fn option_keys(&self) -> &[&str] {
        &["template"]
    }

    fn render(&self, doc: &Document, options: &RenderOptions) -> Result<Rendered, FormatError> {
        let template = options
            .get("template")
            .map(PathBuf::from)
            .or_else(|| self.template.clone());
        render_docx_with_template_path(doc, template.as_deref()).map(Rendered::Binary)
    }
}
