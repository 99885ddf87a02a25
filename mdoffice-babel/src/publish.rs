//! Document publishing and artifact storage.
//!
//! [`publish`] runs a block-model document through a registered writer and either
//! returns the bytes or writes them to a chosen path. [`ArtifactStore`] is the seam for
//! handing finished artifacts to somewhere else and getting a reference back, which is
//! how the conversion tools report results.

use crate::error::FormatError;
use crate::format::{RenderOptions, Rendered};
use crate::ir::nodes::Document;
use crate::registry::FormatRegistry;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new(&document, "docx")
///     .with_output_path("report.docx")
///     .with_option("template", "corporate.docx");
/// ```
///
/// Without an output path, text formats return in-memory content and binary formats
/// return their bytes.
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub document: &'a Document,
    /// Target format name (e.g., "docx", "xlsx", "treeviz").
    pub format: &'a str,
    pub output: Option<PathBuf>,
    /// Format-specific options (e.g., template, sheet title).
    pub options: RenderOptions,
}

impl<'a> PublishSpec<'a> {
    pub fn new(document: &'a Document, format: &'a str) -> Self {
        Self {
            document,
            format,
            output: None,
            options: RenderOptions::new(),
        }
    }

    /// Sets the output file path. If provided, content is written to disk.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    InMemory(String),
    Bytes(Vec<u8>),
    /// Path to the written file (when output path was specified).
    File(PathBuf),
}

/// Render a document as described by a [`PublishSpec`].
///
/// # Errors
///
/// Returns [`FormatError`] if:
/// - The format is not supported
/// - Serialization fails
/// - File I/O fails
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishArtifact, FormatError> {
    let registry = FormatRegistry::with_defaults();
    let rendered = registry.render(spec.document, spec.format, &spec.options)?;
    match (rendered, spec.output) {
        (rendered, Some(path)) => write_to_path(path, rendered.into_bytes()).map(PublishArtifact::File),
        (Rendered::Text(text), None) => Ok(PublishArtifact::InMemory(text)),
        (Rendered::Binary(bytes), None) => Ok(PublishArtifact::Bytes(bytes)),
    }
}

fn write_to_path(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, FormatError> {
    fs::write(&path, &bytes)
        .map(|_| path.clone())
        .map_err(|err| FormatError::Storage(format!("{}: {err}", path.display())))
}

/// What kind of artifact is being stored; decides the file suffix and content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Docx,
    Xlsx,
    Pptx,
    Eml,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Docx => "docx",
            ArtifactKind::Xlsx => "xlsx",
            ArtifactKind::Pptx => "pptx",
            ArtifactKind::Eml => "eml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ArtifactKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ArtifactKind::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            ArtifactKind::Eml => "message/rfc822",
        }
    }
}

/// Persists finished artifacts and returns a reference to them.
pub trait ArtifactStore: Send + Sync {
    fn store(&self, bytes: &[u8], kind: ArtifactKind) -> Result<String, FormatError>;
}

/// Stores artifacts as `<uuid>.<ext>` files in a directory and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for LocalStore {
    fn store(&self, bytes: &[u8], kind: ArtifactKind) -> Result<String, FormatError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| FormatError::Storage(format!("{}: {e}", self.root.display())))?;
        let root = fs::canonicalize(&self.root)
            .map_err(|e| FormatError::Storage(format!("{}: {e}", self.root.display())))?;
        let path = root.join(format!("{}.{}", Uuid::new_v4(), kind.extension()));
        let path = write_to_path(path, bytes.to_vec())?;
        debug!(path = %path.display(), bytes = bytes.len(), "stored artifact");
        Url::from_file_path(&path)
            .map(String::from)
            .map_err(|_| FormatError::Storage(format!("{} is not an absolute path", path.display())))
    }
}
