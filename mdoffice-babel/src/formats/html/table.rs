//! HTML `<table>` → table model.

use markup5ever_rcdom::Handle;

use super::dom::{attr, element_children, style_property, tag_name};
use super::parser::{extract_inlines, text_content};
use crate::ir::nodes::{Table, TableCell, TableCellAlignment, TableRow};

/// Read every `tr` of a table in document order, without entering nested tables.
pub fn extract_html_table(table: &Handle) -> Table {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    Table { rows }
}

fn collect_rows(node: &Handle, rows: &mut Vec<TableRow>) {
    for child in element_children(node) {
        match tag_name(&child) {
            Some("tr") => rows.push(read_row(&child)),
            Some("thead" | "tbody" | "tfoot") => collect_rows(&child, rows),
            _ => {}
        }
    }
}

fn read_row(tr: &Handle) -> TableRow {
    let cells = element_children(tr)
        .iter()
        .filter(|c| matches!(tag_name(c), Some("th" | "td")))
        .map(|cell| TableCell {
            text: text_content(cell),
            content: extract_inlines(cell),
            align: cell_alignment(cell),
        })
        .collect();
    TableRow { cells }
}

fn cell_alignment(cell: &Handle) -> TableCellAlignment {
    style_property(cell, "text-align")
        .or_else(|| attr(cell, "align"))
        .map(|value| TableCellAlignment::from_css(&value))
        .unwrap_or_default()
}
