//! PPTX writer
//!
//! Unlike the document formats, presentations are not rendered from the block model.
//! Callers hand over a list of slide records (usually JSON) and each record becomes one
//! slide on a layout of the template:
//!
//! | Record   | Layout (default index)   | Placeholders                          |
//! |----------|--------------------------|---------------------------------------|
//! | title    | Title Slide (0)          | 0 = title, 1 = author                 |
//! | section  | Section Header (2)       | 0 = title                             |
//! | content  | Title and Content (1)    | 0 = title, 1 = one paragraph per item |
//!
//! Content items carry a 1-based `indentation_level`; paragraphs get the 0-based
//! outline level `max(0, level - 1)` and are left aligned. Placeholders a layout does
//! not have are skipped. Records with an unknown `slide_type` are skipped with a
//! warning.
//!
//! A user template replaces the built-in one when it can be opened. Slides already in
//! the template are removed first.

pub mod deck;
pub mod template;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::package::Package;
use crate::error::FormatError;

pub use self::deck::{Deck, Layout, Placeholder, SlideParagraph};
pub use self::template::{builtin_package, AspectRatio, LayoutIndices};

/// Deepest outline level PowerPoint supports.
const MAX_LEVEL: i64 = 8;

/// A bullet on a content slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideItem {
    pub text: String,
    /// 1-based, as callers write it.
    pub indentation_level: i64,
}

impl SlideItem {
    pub fn new(text: impl Into<String>, indentation_level: i64) -> Self {
        Self {
            text: text.into(),
            indentation_level,
        }
    }

    /// 0-based outline level.
    pub fn level(&self) -> u32 {
        self.indentation_level.saturating_sub(1).clamp(0, MAX_LEVEL) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slide_type", rename_all = "lowercase")]
pub enum SlideRecord {
    Title { title: String, author: String },
    Section { title: String },
    Content { title: String, items: Vec<SlideItem> },
}

/// A slide as callers send it. Every field is optional; missing text is empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSlide {
    #[serde(default)]
    pub slide_type: Option<String>,
    #[serde(default)]
    pub slide_title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub slide_text: Vec<RawSlideText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSlideText {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_level", deserialize_with = "level_from_any")]
    pub indentation_level: i64,
}

fn default_level() -> i64 {
    1
}

/// Levels arrive as numbers or numeric strings.
fn level_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(default_level()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| de::Error::custom(format!("invalid indentation level {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid indentation level '{s}'"))),
        other => Err(de::Error::custom(format!(
            "invalid indentation level {other}"
        ))),
    }
}

/// A record that could not become a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideIssue {
    UnknownType {
        index: usize,
        slide_type: Option<String>,
    },
}

impl std::fmt::Display for SlideIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlideIssue::UnknownType { index, slide_type } => write!(
                f,
                "unknown slide type '{}' for slide {index}, skipped",
                slide_type.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Classify raw slides. Unknown types are reported and left out.
pub fn slides_from_raw(raw: Vec<RawSlide>) -> (Vec<SlideRecord>, Vec<SlideIssue>) {
    let mut records = Vec::with_capacity(raw.len());
    let mut issues = Vec::new();
    for (index, slide) in raw.into_iter().enumerate() {
        let title = slide.slide_title.unwrap_or_default();
        let record = match slide.slide_type.as_deref() {
            Some("title") => SlideRecord::Title {
                title,
                author: slide.author.unwrap_or_default(),
            },
            Some("section") => SlideRecord::Section { title },
            Some("content") => SlideRecord::Content {
                title,
                items: slide
                    .slide_text
                    .into_iter()
                    .map(|t| SlideItem::new(t.text, t.indentation_level))
                    .collect(),
            },
            _ => {
                let issue = SlideIssue::UnknownType {
                    index,
                    slide_type: slide.slide_type,
                };
                warn!("{issue}");
                issues.push(issue);
                continue;
            }
        };
        records.push(record);
    }
    (records, issues)
}

/// Parse a JSON array of slides.
pub fn slides_from_json(json: &str) -> Result<(Vec<SlideRecord>, Vec<SlideIssue>), FormatError> {
    let raw: Vec<RawSlide> = serde_json::from_str(json)
        .map_err(|e| FormatError::ParseError(format!("slides: {e}")))?;
    if raw.is_empty() {
        return Err(FormatError::InvalidInput("No slides provided".to_string()));
    }
    Ok(slides_from_raw(raw))
}

/// Read an aspect ratio, falling back to 4:3 with a warning.
pub fn aspect_or_default(value: &str) -> AspectRatio {
    value.parse().unwrap_or_else(|_| {
        warn!(aspect = value, "unknown aspect ratio, defaulting to 4:3");
        AspectRatio::FourThree
    })
}

#[derive(Debug, Clone, Default)]
pub struct PptxOptions {
    pub aspect: AspectRatio,
    pub layouts: LayoutIndices,
    /// Contents of a `.pptx` to build on instead of the built-in template.
    pub template: Option<Vec<u8>>,
}

/// Render slide records into PPTX bytes.
pub fn render_pptx(slides: &[SlideRecord], options: &PptxOptions) -> Result<Vec<u8>, FormatError> {
    if slides.is_empty() {
        return Err(FormatError::InvalidInput(
            "At least one slide is required".to_string(),
        ));
    }

    let mut deck = open_deck(options)?;
    for (i, slide) in slides.iter().enumerate() {
        add_record(&mut deck, slide, &options.layouts)
            .map_err(|e| FormatError::SerializationError(format!("Error creating slide {i}: {e}")))?;
    }
    debug!(slides = deck.slide_count(), "rendered presentation");
    deck.finish()
}

fn open_deck(options: &PptxOptions) -> Result<Deck, FormatError> {
    if let Some(bytes) = &options.template {
        match Package::from_zip(bytes).and_then(Deck::open) {
            Ok(deck) => return Ok(deck),
            Err(e) => warn!(error = %e, "pptx template unusable, using built-in template"),
        }
    }
    Deck::open(builtin_package(options.aspect)?)
}

fn add_record(deck: &mut Deck, slide: &SlideRecord, layouts: &LayoutIndices) -> Result<(), FormatError> {
    let added = match slide {
        SlideRecord::Title { title, author } => deck.add_slide(
            layouts.title,
            &[
                vec![SlideParagraph::plain(title.as_str())],
                vec![SlideParagraph::plain(author.as_str())],
            ],
        ),
        SlideRecord::Section { title } => {
            deck.add_slide(layouts.section, &[vec![SlideParagraph::plain(title.as_str())]])
        }
        SlideRecord::Content { title, items } => {
            let body = items
                .iter()
                .map(|item| SlideParagraph::leveled(item.text.as_str(), item.level()))
                .collect();
            deck.add_slide(
                layouts.content,
                &[vec![SlideParagraph::plain(title.as_str())], body],
            )
        }
    };
    added.map(|_| ())
}
