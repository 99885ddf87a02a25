//! Markdown and HTML to office documents
//!
//!     This crate turns lightly formatted text into Word, Excel and PowerPoint packages and
//!     into e-mail drafts. Everything happens in memory: callers get bytes back and decide
//!     where they go (see ./publish.rs for the storage seam).
//!
//! Architecture
//!
//!     Sources are read into a small block model (./ir/nodes.rs): headings, paragraphs,
//!     quotes, nested lists, tables and rules, each holding inline spans. Readers live in
//!     ./formats/markdown and ./formats/html; the HTML reader also backs the CommonMark
//!     path, where comrak renders to HTML first.
//!
//!     Writers consume the block model:
//!     - DOCX: styled paragraphs, numbered and bulleted lists, tables, hyperlinks.
//!     - XLSX: headings and tables on a single sheet, with spreadsheet-style formulas in
//!       table cells translated to absolute cell addresses.
//!     - treeviz / JSON: debugging views of the block model.
//!
//!     PPTX works from slide records (title, section, content) instead of the block model,
//!     and EML wraps an HTML body into a draft message.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait: readers and writers
//!     ├── registry.rs             # FormatRegistry: lookup by name and input extension
//!     ├── publish.rs              # Artifact storage
//!     ├── formats
//!     │   ├── <format>
//!     │   │   └── mod.rs
//!     ├── ir                      # Block model
//!     └── common                  # Tables, XML escaping, zip packages
//!
//!     Office parts are written by hand as XML strings and zipped with the zip crate; no
//!     office templates are required, though DOCX and PPTX accept one.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common                  # package readers shared by the suites
//!     └── <format>/<topic>.rs
//!
//!     Unit tests sit next to the code. Integration tests open the produced packages and
//!     check the parts that matter.

pub mod error;
pub mod format;
pub mod formats;
pub mod publish;
pub mod registry;

pub mod common;
pub mod ir;

pub use error::FormatError;
pub use format::{Format, FormatRole, RenderOptions, Rendered};
pub use registry::FormatRegistry;
