//! Core data structures for the Intermediate Representation (IR).

use serde::Serialize;

/// Root of a parsed document: blocks in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// A block-level document unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Quote(Quote),
    List(List),
    Table(Table),
    Rule,
}

/// Represents a heading with a specific level (1..=6).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<Inline>,
}

/// Represents a paragraph of text.
///
/// `hard_breaks` marks paragraphs assembled from lines ending in two spaces;
/// the breaks themselves are carried as [`Inline::Break`] spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub content: Vec<Inline>,
    pub hard_breaks: bool,
}

impl Paragraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Represents a block quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub content: Vec<Inline>,
}

/// Represents a list of items at a given nesting level (0-based).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub level: usize,
    pub items: Vec<ListItem>,
}

/// Represents an item in a list. Nested lists always sit one level deeper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub content: Vec<Inline>,
    pub children: Vec<List>,
}

/// Represents a table. Row 0 is the header row; rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }

    /// The grid as plain cell strings, as written by the author.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.text.clone()).collect())
            .collect()
    }
}

/// Represents a table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Represents a table cell.
///
/// `text` keeps the raw cell source (markup included for markdown tables),
/// `content` the inline spans parsed from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub text: String,
    pub content: Vec<Inline>,
    pub align: TableCellAlignment,
}

/// Alignment of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCellAlignment {
    Left,
    Center,
    Right,
    #[default]
    None,
}

impl TableCellAlignment {
    /// Reads a CSS `text-align` value.
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => TableCellAlignment::Left,
            "center" => TableCellAlignment::Center,
            "right" => TableCellAlignment::Right,
            _ => TableCellAlignment::None,
        }
    }
}

/// Represents inline content: a styled fragment of one logical line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
    Break,
}

impl Inline {
    /// The literal characters this span contributes, ignoring style.
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text) | Inline::Bold(text) | Inline::Italic(text) | Inline::Code(text) => {
                text
            }
            Inline::Link { text, .. } => text,
            Inline::Break => "",
        }
    }
}

/// Concatenates the literal text of a span sequence. Breaks become newlines.
pub fn plain_text(content: &[Inline]) -> String {
    let mut out = String::new();
    for span in content {
        match span {
            Inline::Break => out.push('\n'),
            other => out.push_str(other.text()),
        }
    }
    out
}
