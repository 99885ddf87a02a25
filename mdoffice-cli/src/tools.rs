//! Conversion tools
//!
//! One function per tool: render the artifact, hand it to the store, return the store's
//! reference. Failures come back as `Error creating <kind>: <message>` strings so tool
//! hosts can show them as-is. The `render_*` halves are public for callers that want
//! the bytes themselves.

use std::fs;
use std::path::Path;

use mdoffice_babel::formats::docx::render_docx_with_template_path;
use mdoffice_babel::formats::eml::{render_eml, EmailDraft, Priority};
use mdoffice_babel::formats::html::parse_html_str;
use mdoffice_babel::formats::markdown::parse_markdown;
use mdoffice_babel::formats::pptx::{aspect_or_default, render_pptx, slides_from_json, PptxOptions};
use mdoffice_babel::formats::xlsx::render_xlsx;
use mdoffice_babel::ir::nodes::Document;
use mdoffice_babel::publish::{ArtifactKind, ArtifactStore, LocalStore};
use mdoffice_babel::FormatError;
use mdoffice_config::MdOfficeConfig;
use tracing::{debug, warn};

/// Caller-facing e-mail fields; unset values come from configuration.
#[derive(Debug, Clone, Default)]
pub struct EmailRequest {
    pub subject: String,
    pub content: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub priority: Option<String>,
    pub language: Option<String>,
}

pub struct Tools {
    config: MdOfficeConfig,
    store: Box<dyn ArtifactStore>,
}

impl Tools {
    pub fn new(config: MdOfficeConfig, store: Box<dyn ArtifactStore>) -> Self {
        Self { config, store }
    }

    /// Tools that store artifacts in the configured output directory.
    pub fn from_config(config: MdOfficeConfig) -> Self {
        let store = LocalStore::new(config.storage.output_dir.clone());
        Self::new(config, Box::new(store))
    }

    pub fn config(&self) -> &MdOfficeConfig {
        &self.config
    }

    pub fn create_word_from_markdown(&self, markdown: &str) -> String {
        self.deliver("Word document", ArtifactKind::Docx, self.render_word_from_markdown(markdown))
    }

    pub fn create_word_from_html(&self, html: &str) -> String {
        self.deliver("Word document", ArtifactKind::Docx, self.render_word_from_html(html))
    }

    pub fn create_excel_from_markdown(&self, markdown: &str) -> String {
        self.deliver("Excel document", ArtifactKind::Xlsx, self.render_excel_from_markdown(markdown))
    }

    /// `slides` is a JSON array of slide records; `aspect` overrides the configured one.
    pub fn create_powerpoint_presentation(&self, slides: &str, aspect: Option<&str>) -> String {
        self.deliver(
            "PowerPoint presentation",
            ArtifactKind::Pptx,
            self.render_powerpoint_presentation(slides, aspect),
        )
    }

    pub fn create_email_draft(&self, request: &EmailRequest) -> String {
        self.deliver("email draft", ArtifactKind::Eml, self.render_email_draft(request))
    }

    /// Hand finished bytes to the store.
    pub fn store(&self, bytes: &[u8], kind: ArtifactKind) -> Result<String, FormatError> {
        self.store.store(bytes, kind)
    }

    pub fn render_word(&self, doc: &Document) -> Result<Vec<u8>, FormatError> {
        render_docx_with_template_path(doc, self.config.convert.docx.template.as_deref())
    }

    pub fn render_word_from_markdown(&self, markdown: &str) -> Result<Vec<u8>, FormatError> {
        self.render_word(&parse_markdown(markdown))
    }

    pub fn render_word_from_html(&self, html: &str) -> Result<Vec<u8>, FormatError> {
        self.render_word(&parse_html_str(html)?)
    }

    pub fn render_excel(&self, doc: &Document) -> Result<Vec<u8>, FormatError> {
        render_xlsx(doc, &self.config.convert.xlsx.sheet_title)
    }

    pub fn render_excel_from_markdown(&self, markdown: &str) -> Result<Vec<u8>, FormatError> {
        self.render_excel(&parse_markdown(markdown))
    }

    pub fn render_powerpoint_presentation(
        &self,
        slides: &str,
        aspect: Option<&str>,
    ) -> Result<Vec<u8>, FormatError> {
        let (records, issues) = slides_from_json(slides)?;
        if !issues.is_empty() {
            debug!(skipped = issues.len(), "slides skipped");
        }

        let pptx = &self.config.convert.pptx;
        let aspect = aspect.map(aspect_or_default).unwrap_or_else(|| pptx.aspect_ratio());
        let options = PptxOptions {
            aspect,
            layouts: pptx.layouts.into(),
            template: pptx.template_for(aspect).and_then(read_template),
        };
        render_pptx(&records, &options)
    }

    pub fn render_email_draft(&self, request: &EmailRequest) -> Result<Vec<u8>, FormatError> {
        let eml = &self.config.convert.eml;
        let priority = match &request.priority {
            Some(raw) => raw.parse::<Priority>()?,
            None => eml.priority,
        };
        let draft = EmailDraft {
            to: request.to.clone(),
            cc: request.cc.clone(),
            bcc: request.bcc.clone(),
            subject: request.subject.clone(),
            content: request.content.clone(),
            priority,
            language: request.language.clone().unwrap_or_else(|| eml.language.clone()),
        };
        render_eml(&draft)
    }

    fn deliver(
        &self,
        what: &str,
        kind: ArtifactKind,
        rendered: Result<Vec<u8>, FormatError>,
    ) -> String {
        match rendered.and_then(|bytes| self.store(&bytes, kind)) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(error = %e, kind = kind.extension(), "conversion failed");
                format!("Error creating {what}: {e}")
            }
        }
    }
}

fn read_template(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "pptx template not found, using built-in template");
            None
        }
    }
}
