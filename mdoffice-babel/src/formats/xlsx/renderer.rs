//! Block model → worksheet.
//!
//! Only headings and tables reach the sheet; other blocks are skipped.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use tracing::debug;

use super::cell::{
    column_to_letters, decode_emphasis, Cell, CellStyle, CellValue, Fill, FontStyle,
    HorizontalAlignment, NumberFormat,
};
use super::formula::{detect_formula, translate_formula, TablePositions, UnresolvedReference};
use super::styles::StylesBuilder;
use crate::common::xml::{escape_xml, needs_space_preserve};
use crate::error::FormatError;
use crate::ir::nodes::{plain_text, Block, Document};

const MIN_COLUMN_WIDTH: usize = 12;
const MAX_COLUMN_WIDTH: usize = 25;

/// In-memory sheet: cells keyed by `(row, column)`, both 1-based.
#[derive(Debug, Default)]
pub struct Worksheet {
    pub cells: BTreeMap<(u32, u32), Cell>,
    pub column_widths: BTreeMap<u32, usize>,
}

impl Worksheet {
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn to_xml(&self, styles: &mut StylesBuilder) -> Result<String, FormatError> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.column_widths.is_empty() {
            xml.push_str("<cols>");
            for (col, width) in &self.column_widths {
                write!(
                    xml,
                    r#"<col min="{col}" max="{col}" width="{width}" customWidth="1"/>"#
                )?;
            }
            xml.push_str("</cols>");
        }

        xml.push_str("<sheetData>");
        let mut open_row = None;
        for ((row, col), cell) in &self.cells {
            if open_row != Some(*row) {
                if open_row.is_some() {
                    xml.push_str("</row>");
                }
                write!(xml, r#"<row r="{row}">"#)?;
                open_row = Some(*row);
            }
            let reference = format!("{}{row}", column_to_letters(*col));
            let style = styles.intern(cell.style);
            match &cell.value {
                CellValue::Number(n) => {
                    write!(xml, r#"<c r="{reference}" s="{style}"><v>{n}</v></c>"#)?
                }
                CellValue::Formula(f) => write!(
                    xml,
                    r#"<c r="{reference}" s="{style}"><f>{}</f></c>"#,
                    escape_xml(f)
                )?,
                CellValue::Text(t) => {
                    let space = if needs_space_preserve(t) {
                        r#" xml:space="preserve""#
                    } else {
                        ""
                    };
                    write!(
                        xml,
                        r#"<c r="{reference}" s="{style}" t="inlineStr"><is><t{space}>{}</t></is></c>"#,
                        escape_xml(t)
                    )?
                }
            }
        }
        if open_row.is_some() {
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        Ok(xml)
    }
}

/// Walks blocks top to bottom, writing headings and tables.
#[derive(Debug)]
pub struct XlsxRenderer {
    sheet: Worksheet,
    tables: TablePositions,
    fallbacks: Vec<UnresolvedReference>,
    current_row: u32,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxRenderer {
    pub fn new() -> Self {
        Self {
            sheet: Worksheet::default(),
            tables: TablePositions::new(),
            fallbacks: Vec::new(),
            current_row: 1,
        }
    }

    pub fn render(mut self, doc: &Document) -> Worksheet {
        for block in &doc.blocks {
            match block {
                Block::Heading(h) => self.write_heading(h.level, &plain_text(&h.content)),
                Block::Table(table) => {
                    let grid = table.grid();
                    self.current_row = self.write_table(&grid, self.current_row);
                }
                _ => {}
            }
        }
        debug!(
            tables = self.tables.len(),
            cells = self.sheet.cells.len(),
            unresolved = self.fallbacks.len(),
            "rendered worksheet"
        );
        self.sheet
    }

    /// References that fell back to the current row while rendering.
    pub fn fallbacks(&self) -> &[UnresolvedReference] {
        &self.fallbacks
    }

    pub fn write_heading(&mut self, level: u8, text: &str) {
        self.sheet.cells.insert(
            (self.current_row, 1),
            Cell {
                value: CellValue::Text(text.to_string()),
                style: CellStyle {
                    font: FontStyle::Heading(level),
                    ..CellStyle::default()
                },
            },
        );
        self.current_row += 2;
    }

    /// Write one table with its header at `start_row`; returns the next free row.
    pub fn write_table(&mut self, grid: &[Vec<String>], start_row: u32) -> u32 {
        if grid.is_empty() {
            return start_row;
        }
        // Registered first so the table's own formulas can refer to it.
        let id = self.tables.register(i64::from(start_row));
        debug!(table = %id, start_row, rows = grid.len(), "writing table");

        for (row_index, row) in grid.iter().enumerate() {
            let sheet_row = start_row + row_index as u32;
            for (col_index, raw) in row.iter().enumerate() {
                let cell = self.build_cell(raw, row_index == 0, sheet_row);
                self.sheet
                    .cells
                    .insert((sheet_row, col_index as u32 + 1), cell);
            }
        }

        for col in 0..grid[0].len() {
            let longest = grid
                .iter()
                .filter_map(|row| row.get(col))
                .map(|text| text.chars().count())
                .max()
                .unwrap_or(0);
            let width = (longest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            self.sheet.column_widths.insert(col as u32 + 1, width);
        }

        start_row + grid.len() as u32 + 2
    }

    fn build_cell(&mut self, raw: &str, is_header: bool, sheet_row: u32) -> Cell {
        let (text, emphasis) = decode_emphasis(raw);

        let value = match detect_formula(&text) {
            Some(formula) => {
                let translation = translate_formula(&formula, i64::from(sheet_row), &self.tables);
                self.fallbacks.extend(translation.fallbacks);
                if translation.out_of_range.is_empty() {
                    CellValue::Formula(translation.formula.trim_start_matches('=').to_string())
                } else {
                    CellValue::Text(text.clone())
                }
            }
            None => CellValue::coerce(&text),
        };

        let align = if is_header {
            HorizontalAlignment::Center
        } else if value.is_numeric() || value.is_formula() {
            HorizontalAlignment::Right
        } else {
            HorizontalAlignment::Left
        };

        let style = if is_header {
            CellStyle {
                font: FontStyle::Header,
                fill: Fill::Header,
                bordered: true,
                align: Some(align),
                number_format: NumberFormat::General,
            }
        } else {
            CellStyle {
                font: emphasis.into(),
                fill: if value.is_formula() {
                    Fill::Formula
                } else {
                    Fill::None
                },
                bordered: true,
                align: Some(align),
                number_format: NumberFormat::for_value(&value),
            }
        };

        Cell { value, style }
    }
}
