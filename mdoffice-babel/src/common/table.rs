//! Pipe-table extraction for the markdown dialect.
//!
//! Both table entry points (this one and the HTML one in
//! `formats::html::table`) converge on the same [`Table`] grid. Markdown rows
//! are not padded: ragged rows survive extraction and renderers size their
//! grids from [`Table::column_count`].

use crate::formats::markdown::inline::parse_inline;
use crate::ir::nodes::{Table, TableCell, TableCellAlignment, TableRow};

/// Collects the pipe-delimited lines starting at `start`.
///
/// Returns the table and the index of the first line after it. When fewer than
/// two lines are found (no header + separator) the table is rejected and the
/// caller resumes at `start + 1`, treating the first line as ordinary text.
pub fn extract_markdown_table(lines: &[&str], start: usize) -> (Option<Table>, usize) {
    let mut collected = Vec::new();
    let mut index = start;
    while index < lines.len() && is_pipe_row(lines[index]) {
        collected.push(lines[index].trim());
        index += 1;
    }

    if collected.len() < 2 {
        return (None, start + 1);
    }

    let alignments = collected
        .iter()
        .find(|line| is_separator_row(line))
        .map(|line| separator_alignments(line))
        .unwrap_or_default();

    let rows = collected
        .iter()
        .filter(|line| !is_separator_row(line))
        .map(|line| TableRow {
            cells: split_pipe_row(line)
                .into_iter()
                .enumerate()
                .map(|(i, text)| TableCell {
                    content: parse_inline(&text),
                    align: alignments.get(i).copied().unwrap_or_default(),
                    text,
                })
                .collect(),
        })
        .collect();

    (Some(Table { rows }), index)
}

/// A line that starts and ends with `|`.
pub fn is_pipe_row(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// The markdown alignment separator: only pipes, dashes, colons and blanks.
pub fn is_separator_row(line: &str) -> bool {
    line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Splits a row on `|`, dropping the empty cells produced by the outer pipes.
pub fn split_pipe_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);

    line.split('|').map(|s| s.trim().to_string()).collect()
}

fn separator_alignments(line: &str) -> Vec<TableCellAlignment> {
    split_pipe_row(line)
        .iter()
        .map(|part| {
            let trimmed = part.trim();
            if trimmed.starts_with(':') && trimmed.ends_with(':') {
                TableCellAlignment::Center
            } else if trimmed.ends_with(':') {
                TableCellAlignment::Right
            } else if trimmed.starts_with(':') {
                TableCellAlignment::Left
            } else {
                TableCellAlignment::None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_separator_and_outer_pipes() {
        let lines = ["| a | b |", "|---|---|", "| 1 | 2 |", "after"];
        let (table, next) = extract_markdown_table(&lines, 0);
        let table = table.expect("table");
        assert_eq!(next, 3);
        assert_eq!(
            table.grid(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()]
            ]
        );
    }

    #[test]
    fn single_line_is_not_a_table() {
        let lines = ["| lonely |", "text"];
        let (table, next) = extract_markdown_table(&lines, 0);
        assert!(table.is_none());
        assert_eq!(next, 1);
    }

    #[test]
    fn ragged_rows_are_kept_as_written() {
        let lines = ["| a | b | c |", "| --- | --- | --- |", "| 1 |"];
        let (table, _) = extract_markdown_table(&lines, 0);
        let table = table.expect("table");
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[1].cells.len(), 1);
    }

    #[test]
    fn separator_colons_set_alignment() {
        let lines = ["| l | c | r |", "|:--|:-:|--:|", "| 1 | 2 | 3 |"];
        let (table, _) = extract_markdown_table(&lines, 0);
        let aligns: Vec<_> = table.expect("table").rows[1]
            .cells
            .iter()
            .map(|c| c.align)
            .collect();
        assert_eq!(
            aligns,
            vec![
                TableCellAlignment::Left,
                TableCellAlignment::Center,
                TableCellAlignment::Right
            ]
        );
    }

    #[test]
    fn cells_keep_markup_in_text_and_spans_in_content() {
        let lines = ["| **h** |", "|---|", "| =B[0]*2 |"];
        let (table, _) = extract_markdown_table(&lines, 0);
        let table = table.expect("table");
        assert_eq!(table.rows[0].cells[0].text, "**h**");
        assert_eq!(table.rows[1].cells[0].text, "=B[0]*2");
    }
}
