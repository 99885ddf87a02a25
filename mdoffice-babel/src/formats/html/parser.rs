//! HTML tree → block model.
//!
//! Walks the children of `<body>` and keeps only the subset that maps onto the
//! block model. Anything unrecognised is skipped, caller HTML is best effort.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, RcDom};
use tracing::debug;

use super::dom::{attr, element_children, find_element, raw_text, tag_name, text_of};
use super::table::extract_html_table;
use crate::error::FormatError;
use crate::ir::nodes::{Block, Document, Heading, Inline, List, ListItem, Paragraph, Quote};

/// Parse an HTML string and read its body into a document.
pub fn parse_html_str(html: &str) -> Result<Document, FormatError> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let root = find_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
    Ok(Document::new(parse_html(&root)))
}

/// Read the block-level children of `root`.
pub fn parse_html(root: &Handle) -> Vec<Block> {
    let mut blocks = Vec::new();
    collect_blocks(root, &mut blocks);
    blocks
}

fn collect_blocks(parent: &Handle, blocks: &mut Vec<Block>) {
    for child in element_children(parent) {
        let Some(tag) = tag_name(&child) else {
            continue;
        };
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().unwrap_or(1);
                blocks.push(Block::Heading(Heading {
                    level,
                    content: extract_inlines(&child),
                }));
            }
            "p" => blocks.push(Block::Paragraph(Paragraph {
                content: extract_inlines(&child),
                hard_breaks: false,
            })),
            "ul" | "ol" => blocks.push(Block::List(extract_list(&child, 0))),
            "table" => blocks.push(Block::Table(extract_html_table(&child))),
            "blockquote" => blocks.push(Block::Quote(Quote {
                content: extract_inlines(&child),
            })),
            "pre" => blocks.push(Block::Paragraph(preformatted(&child))),
            "hr" => blocks.push(Block::Rule),
            "div" | "section" | "article" | "main" | "header" | "footer" => {
                collect_blocks(&child, blocks)
            }
            other => debug!(tag = other, "skipping unsupported html element"),
        }
    }
}

/// Read a `ul`/`ol` element. Nested lists are direct children of `li`.
pub fn extract_list(node: &Handle, level: usize) -> List {
    let ordered = tag_name(node) == Some("ol");
    let items = element_children(node)
        .into_iter()
        .filter(|c| tag_name(c) == Some("li"))
        .map(|li| ListItem {
            content: extract_inlines(&li),
            children: element_children(&li)
                .iter()
                .filter(|c| matches!(tag_name(c), Some("ul" | "ol")))
                .map(|nested| extract_list(nested, level + 1))
                .collect(),
        })
        .collect();
    List {
        ordered,
        level,
        items,
    }
}

/// Inline spans of an element, excluding any nested lists.
pub fn extract_inlines(node: &Handle) -> Vec<Inline> {
    let mut spans = Vec::new();
    collect_inlines(node, &mut spans);
    trim_edges(&mut spans);
    spans
}

fn collect_inlines(node: &Handle, spans: &mut Vec<Inline>) {
    for child in node.children.borrow().iter() {
        if let Some(text) = text_of(child) {
            if !text.trim().is_empty() {
                spans.push(Inline::Text(collapse_whitespace(&text)));
            } else if !text.is_empty() && !spans.is_empty() {
                spans.push(Inline::Text(" ".to_string()));
            }
            continue;
        }
        let Some(tag) = tag_name(child) else {
            continue;
        };
        match tag {
            "strong" | "b" => push_styled(spans, Inline::Bold(text_content(child))),
            "em" | "i" => push_styled(spans, Inline::Italic(text_content(child))),
            "code" => push_styled(spans, Inline::Code(text_content(child))),
            "a" => {
                let text = text_content(child);
                match attr(child, "href") {
                    Some(url) => push_styled(spans, Inline::Link { text, url }),
                    None => push_styled(spans, Inline::Text(text)),
                }
            }
            "br" => spans.push(Inline::Break),
            "ul" | "ol" | "script" | "style" => {}
            _ => collect_inlines(child, spans),
        }
    }
}

fn push_styled(spans: &mut Vec<Inline>, span: Inline) {
    if !span.text().is_empty() {
        spans.push(span);
    }
}

/// Flattened, whitespace-collapsed text of a subtree.
pub fn text_content(node: &Handle) -> String {
    collapse_whitespace(&raw_text(node)).trim().to_string()
}

fn preformatted(node: &Handle) -> Paragraph {
    let raw = raw_text(node);
    let mut content = Vec::new();
    for (i, line) in raw.trim_end_matches('\n').lines().enumerate() {
        if i > 0 {
            content.push(Inline::Break);
        }
        if !line.is_empty() {
            content.push(Inline::Code(line.to_string()));
        }
    }
    Paragraph {
        content,
        hard_breaks: true,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drop leading and trailing whitespace at the edges of a span run.
fn trim_edges(spans: &mut Vec<Inline>) {
    if let Some(Inline::Text(first)) = spans.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(Inline::Text(last)) = spans.last_mut() {
        *last = last.trim_end().to_string();
    }
    spans.retain(|s| matches!(s, Inline::Break) || !s.text().is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::plain_text;

    fn blocks(html: &str) -> Vec<Block> {
        parse_html_str(html).unwrap().blocks
    }

    #[test]
    fn headings_and_paragraphs() {
        let out = blocks("<h2>Title</h2><p>Hello <strong>bold</strong> world</p>");
        assert!(matches!(&out[0], Block::Heading(h) if h.level == 2));
        let Block::Paragraph(p) = &out[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            p.content,
            vec![
                Inline::Text("Hello ".into()),
                Inline::Bold("bold".into()),
                Inline::Text(" world".into()),
            ]
        );
    }

    #[test]
    fn nested_lists_come_from_list_items() {
        let out = blocks("<ul><li>One<ol><li>Inner</li></ol></li><li>Two</li></ul>");
        let Block::List(list) = &out[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 2);
        assert_eq!(plain_text(&list.items[0].content), "One");
        let nested = &list.items[0].children[0];
        assert!(nested.ordered);
        assert_eq!(nested.level, 1);
    }

    #[test]
    fn links_without_href_are_text() {
        let out = blocks(r#"<p><a href="https://x.test">x</a> and <a>y</a></p>"#);
        let Block::Paragraph(p) = &out[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            p.content[0],
            Inline::Link {
                text: "x".into(),
                url: "https://x.test".into()
            }
        );
        assert_eq!(p.content.last(), Some(&Inline::Text("y".into())));
    }

    #[test]
    fn containers_are_transparent_and_unknown_skipped() {
        let out = blocks("<div><section><p>a</p></section><video></video></div><hr>");
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1], Block::Rule));
    }

    #[test]
    fn line_breaks_become_break_spans() {
        let out = blocks("<p>a<br>b</p>");
        let Block::Paragraph(p) = &out[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(plain_text(&p.content), "a\nb");
    }
}
