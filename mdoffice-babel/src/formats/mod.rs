//! Format implementations
//!
//! Readers (markdown, CommonMark, HTML) turn source text into the block model; writers
//! (DOCX, XLSX, treeviz, JSON) turn the block model into output. PPTX and EML take their
//! own input records and sit beside the block pipeline.

pub mod docx;
pub mod eml;
pub mod html;
pub mod icons;
pub mod json;
pub mod markdown;
pub mod pptx;
pub mod treeviz;
pub mod xlsx;

pub use docx::DocxFormat;
pub use eml::{EmailDraft, Priority};
pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::{CommonMarkFormat, MarkdownFormat};
pub use pptx::{PptxOptions, SlideRecord};
pub use treeviz::TreevizFormat;
pub use xlsx::XlsxFormat;
