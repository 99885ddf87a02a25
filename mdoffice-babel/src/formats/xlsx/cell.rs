//! Cell values and the styling attributes a cell can carry.

/// A worksheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Formula text without the leading `=`.
    Formula(String),
}

impl CellValue {
    /// Coerce plain cell text: `42%` → 0.42, numbers → numbers, else text.
    pub fn coerce(text: &str) -> Self {
        let value = text.trim();
        if let Some(percent) = value.strip_suffix('%') {
            if let Some(n) = parse_number(percent) {
                return CellValue::Number(n / 100.0);
            }
        }
        match parse_number(value) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(value.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Inline emphasis decoded from a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emphasis {
    #[default]
    None,
    Bold,
    Italic,
    Monospace,
}

/// Strip one wrapping emphasis marker. Bold wins over italic, italic over code.
pub fn decode_emphasis(text: &str) -> (String, Emphasis) {
    let text = text.trim();
    if text.len() >= 4 && text.starts_with("**") && text.ends_with("**") {
        return (text[2..text.len() - 2].to_string(), Emphasis::Bold);
    }
    if text.len() >= 2 && text.starts_with('*') && text.ends_with('*') {
        return (text[1..text.len() - 1].to_string(), Emphasis::Italic);
    }
    if text.len() >= 2 && text.starts_with('`') && text.ends_with('`') {
        return (text[1..text.len() - 1].to_string(), Emphasis::Monospace);
    }
    (text.to_string(), Emphasis::None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    Monospace,
    /// Bold white, for header rows.
    Header,
    /// Section heading, by heading level.
    Heading(u8),
}

impl From<Emphasis> for FontStyle {
    fn from(emphasis: Emphasis) -> Self {
        match emphasis {
            Emphasis::None => FontStyle::Regular,
            Emphasis::Bold => FontStyle::Bold,
            Emphasis::Italic => FontStyle::Italic,
            Emphasis::Monospace => FontStyle::Monospace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    Header,
    Formula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    General,
    /// `0.00%`
    Percent,
    /// `#,##0`
    Thousands,
}

impl NumberFormat {
    /// Pick the display format for a data cell value.
    pub fn for_value(value: &CellValue) -> Self {
        match value {
            CellValue::Number(n) if *n > 0.0 && *n <= 1.0 => NumberFormat::Percent,
            CellValue::Number(n) if *n >= 1000.0 => NumberFormat::Thousands,
            _ => NumberFormat::General,
        }
    }
}

/// Everything that decides a cell's `xf` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub font: FontStyle,
    pub fill: Fill,
    pub bordered: bool,
    pub align: Option<HorizontalAlignment>,
    pub number_format: NumberFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// Column number to letters (1 → `A`, 27 → `AA`).
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;
    while col > 0 {
        col -= 1;
        letters.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }
    letters
}
