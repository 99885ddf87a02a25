//! Line-oriented block parser for the markdown dialect.
//!
//! The parser makes a single forward pass with an explicit cursor. Every helper
//! that consumes lines returns the index to resume from, so nested list parsing
//! never shares a mutable position.

use once_cell::sync::Lazy;
use regex::Regex;

use super::inline::parse_inline;
use crate::common::table::{extract_markdown_table, is_pipe_row};
use crate::ir::nodes::{Block, Heading, Inline, List, ListItem, Paragraph, Quote};

/// Spaces per list nesting level. A tab counts as one full level.
pub const INDENT_WIDTH: usize = 3;

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());
static RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap());

/// Parse markdown lines into a flat sequence of blocks.
pub fn parse_blocks(lines: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            let run = lines[i..].iter().take_while(|l| is_blank(l)).count();
            // One blank line separates blocks; each extra one is kept as spacing.
            for _ in 1..run {
                blocks.push(Block::Paragraph(Paragraph::empty()));
            }
            i += run;
            continue;
        }

        if has_hard_break(line) {
            let (block, next) = parse_hard_break_unit(lines, i);
            blocks.push(block);
            i = next;
            continue;
        }

        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            blocks.push(Block::Heading(parse_heading(trimmed)));
            i += 1;
            continue;
        }

        if is_pipe_row(trimmed) {
            let (table, next) = extract_markdown_table(lines, i);
            match table {
                Some(table) => blocks.push(Block::Table(table)),
                None => blocks.push(Block::Paragraph(plain_paragraph(trimmed))),
            }
            i = next;
            continue;
        }

        if list_marker(line).is_some() {
            let (list, next) = parse_list(lines, i, 0);
            blocks.push(Block::List(list));
            i = next;
            continue;
        }

        // After lists, so `- - -` is an item and `---` a rule.
        if RULE.is_match(trimmed) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('>') {
            blocks.push(Block::Quote(Quote {
                content: parse_inline(strip_one_space(rest)),
            }));
            i += 1;
            continue;
        }

        blocks.push(Block::Paragraph(plain_paragraph(trimmed)));
        i += 1;
    }

    blocks
}

/// Consume one list starting at `start`.
///
/// An item's indentation level is its [`indent_width`] divided by [`INDENT_WIDTH`].
/// The list takes the level of its first line and keeps consuming items at that
/// level. A deeper item opens a nested list (at `level + 1`) under the most recent
/// item; a shallower item, a blank line, a non-item line, or a change of marker kind
/// ends the list.
///
/// A nested list is responsible for the level of its own first line, so an item that
/// jumps more than one level deeper still nests only one step.
pub fn parse_list(lines: &[&str], start: usize, level: usize) -> (List, usize) {
    let base = indent_level(lines[start]);
    let ordered = matches!(list_marker(lines[start]), Some((true, _)));
    let mut list = List {
        ordered,
        level,
        items: Vec::new(),
    };

    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        let Some((item_ordered, text)) = list_marker(line) else {
            break;
        };
        let line_level = indent_level(line);

        if line_level > base {
            let Some(parent) = list.items.last_mut() else {
                break;
            };
            let (nested, next) = parse_list(lines, i, level + 1);
            parent.children.push(nested);
            i = next;
            continue;
        }
        if line_level < base || item_ordered != ordered {
            break;
        }

        list.items.push(ListItem {
            content: parse_inline(text.trim_end()),
            children: Vec::new(),
        });
        i += 1;
    }

    (list, i)
}

/// Returns `(ordered, item_text)` when the line is a list item.
fn list_marker(line: &str) -> Option<(bool, &str)> {
    let body = line.trim_start();
    if let Some(caps) = ORDERED_ITEM.captures(body) {
        return caps.get(1).map(|m| (true, m.as_str()));
    }
    UNORDERED_ITEM
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| (false, m.as_str()))
}

/// Nesting level implied by a line's indentation.
pub fn indent_level(line: &str) -> usize {
    indent_width(line) / INDENT_WIDTH
}

/// Physical indentation in columns, with tabs expanded to a full level.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
        .sum()
}

fn parse_heading(trimmed: &str) -> Heading {
    Heading {
        level: heading_level(trimmed),
        content: parse_inline(trimmed.trim_start_matches('#').trim()),
    }
}

/// A run of lines joined by explicit breaks.
///
/// The run ends at a blank line (exclusive) or at the first line without the two
/// trailing spaces (inclusive). The first line decides what kind of block it is.
fn parse_hard_break_unit(lines: &[&str], start: usize) -> (Block, usize) {
    let mut end = start;
    while end < lines.len() && !is_blank(lines[end]) {
        end += 1;
        if !has_hard_break(lines[end - 1]) {
            break;
        }
    }

    let first = lines[start].trim();
    let (kind, first_text) = if first.starts_with('#') {
        (UnitKind::Heading(heading_level(first)), first.trim_start_matches('#').trim())
    } else if let Some(rest) = first.strip_prefix('>') {
        (UnitKind::Quote, strip_one_space(rest))
    } else {
        (UnitKind::Paragraph, first)
    };

    let mut content = parse_inline(first_text);
    for line in &lines[start + 1..end] {
        content.push(Inline::Break);
        content.extend(parse_inline(line.trim()));
    }

    let block = match kind {
        UnitKind::Heading(level) => Block::Heading(Heading { level, content }),
        UnitKind::Quote => Block::Quote(Quote { content }),
        UnitKind::Paragraph => Block::Paragraph(Paragraph {
            content,
            hard_breaks: true,
        }),
    };
    (block, end)
}

enum UnitKind {
    Heading(u8),
    Quote,
    Paragraph,
}

fn heading_level(trimmed: &str) -> u8 {
    trimmed.chars().take_while(|c| *c == '#').count().clamp(1, 6) as u8
}

fn plain_paragraph(text: &str) -> Paragraph {
    Paragraph {
        content: parse_inline(text),
        hard_breaks: false,
    }
}

/// Exactly two trailing spaces.
fn has_hard_break(line: &str) -> bool {
    line.ends_with("  ") && !line.ends_with("   ") && !is_blank(line)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}
