//! Treeviz formatter for the block model
//!
//! Treeviz is a visual representation of the parsed document, one node per line. It is
//! what `mdoffice inspect` prints and what the parser tests snapshot.
//!
//! So the format is :
//! <prefix><connector> <icon><space><label> (truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ Document (3 blocks)
//! ├─ § h1 Title
//! ├─ ☰ 2 items (bullet, level 0)
//! │ ├─ • Item 1
//! │ │ └─ ☰ 1 items (bullet, level 1)
//! │ │   └─ • Sub 1
//! │ └─ • Item 2
//! └─ ▦ 2x2 table
//!   ├─ ≡ a | b
//!   └─ ≡ 1 | 2
//!
//! With the `spans` parameter set to `true`, inline spans are listed under the block
//! that holds them.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::{Format, FormatRole, RenderOptions, Rendered};
use crate::ir::nodes::{plain_text, Block, Document, Inline, List};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

struct Node {
    kind: &'static str,
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(kind: &'static str, label: String) -> Self {
        Node {
            kind,
            label,
            children: Vec::new(),
        }
    }
}

fn span_nodes(content: &[Inline]) -> Vec<Node> {
    content
        .iter()
        .map(|span| match span {
            Inline::Text(t) => Node::leaf("Text", t.clone()),
            Inline::Bold(t) => Node::leaf("Bold", t.clone()),
            Inline::Italic(t) => Node::leaf("Italic", t.clone()),
            Inline::Code(t) => Node::leaf("Code", t.clone()),
            Inline::Link { text, url } => Node::leaf("Link", format!("{text} -> {url}")),
            Inline::Break => Node::leaf("Break", String::new()),
        })
        .collect()
}

fn text_label(content: &[Inline]) -> String {
    let text = plain_text(content).replace('\n', " ↵ ");
    if text.is_empty() {
        "(empty)".to_string()
    } else {
        text
    }
}

fn list_node(list: &List, spans: bool) -> Node {
    let kind = if list.ordered { "ordered" } else { "bullet" };
    Node {
        kind: "List",
        label: format!("{} items ({kind}, level {})", list.items.len(), list.level),
        children: list
            .items
            .iter()
            .map(|item| {
                let mut children = if spans {
                    span_nodes(&item.content)
                } else {
                    Vec::new()
                };
                children.extend(item.children.iter().map(|l| list_node(l, spans)));
                Node {
                    kind: "ListItem",
                    label: text_label(&item.content),
                    children,
                }
            })
            .collect(),
    }
}

fn block_node(block: &Block, spans: bool) -> Node {
    let with_spans = |kind, label, content: &[Inline]| Node {
        kind,
        label,
        children: if spans {
            span_nodes(content)
        } else {
            Vec::new()
        },
    };
    match block {
        Block::Heading(h) => with_spans(
            "Heading",
            format!("h{} {}", h.level, text_label(&h.content)),
            &h.content,
        ),
        Block::Paragraph(p) => with_spans("Paragraph", text_label(&p.content), &p.content),
        Block::Quote(q) => with_spans("Quote", text_label(&q.content), &q.content),
        Block::List(list) => list_node(list, spans),
        Block::Table(table) => Node {
            kind: "Table",
            label: format!("{}x{} table", table.rows.len(), table.column_count()),
            children: table
                .grid()
                .into_iter()
                .map(|row| Node::leaf("TableRow", row.join(" | ")))
                .collect(),
        },
        Block::Rule => Node::leaf("Rule", "rule".to_string()),
    }
}

fn truncate(label: &str) -> String {
    if label.chars().count() > LABEL_WIDTH {
        let head: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{head}…")
    } else {
        label.to_string()
    }
}

fn write_children(children: &[Node], prefix: &str, output: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└─" } else { "├─" };
        let label = truncate(&child.label);
        let line = format!("{prefix}{connector} {} {label}", get_icon(child.kind));
        output.push_str(line.trim_end());
        output.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        write_children(&child.children, &child_prefix, output);
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_params(doc, &HashMap::new())
}

/// Convert a document to treeviz string with optional parameters
///
/// # Parameters
///
/// - `"spans"`: When set to `"true"`, lists each block's inline spans as children.
pub fn to_treeviz_str_with_params(doc: &Document, params: &HashMap<String, String>) -> String {
    let spans = params
        .get("spans")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    let mut output = format!("{} Document ({} blocks)\n", get_icon("Document"), doc.blocks.len());
    let children: Vec<Node> = doc.blocks.iter().map(|b| block_node(b, spans)).collect();
    write_children(&children, "", &mut output);
    output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn role(&self) -> FormatRole {
        FormatRole::Writer
    }

    fn option_keys(&self) -> &[&str] {
        &["spans"]
    }

    fn render(&self, doc: &Document, options: &RenderOptions) -> Result<Rendered, FormatError> {
        Ok(Rendered::Text(to_treeviz_str_with_params(doc, options)))
    }
}
