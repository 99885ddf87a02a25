use mdoffice_babel::format::Format;
use mdoffice_babel::formats::html::{parse_html_str, HtmlFormat};
use mdoffice_babel::ir::nodes::{plain_text, Block, Inline};

#[test]
fn test_headings_and_inline_styles() {
    let doc = parse_html_str(
        r#"<h2>Heading</h2><p>Some <strong>bold</strong> and <a href="https://x.test">link</a></p>"#,
    )
    .expect("html parses");

    assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 2));
    let Block::Paragraph(paragraph) = &doc.blocks[1] else {
        panic!("expected paragraph");
    };
    assert_eq!(
        paragraph.content,
        vec![
            Inline::Text("Some ".to_string()),
            Inline::Bold("bold".to_string()),
            Inline::Text(" and ".to_string()),
            Inline::Link {
                text: "link".to_string(),
                url: "https://x.test".to_string()
            },
        ]
    );
}

#[test]
fn test_nested_lists_take_the_next_level() {
    let doc = HtmlFormat
        .parse("<ul><li>one<ul><li>inner</li></ul></li><li>two</li></ul>")
        .expect("html parses");

    let Block::List(list) = &doc.blocks[0] else {
        panic!("expected list");
    };
    assert_eq!(list.level, 0);
    assert_eq!(list.items.len(), 2);
    assert_eq!(plain_text(&list.items[0].content), "one");

    let inner = &list.items[0].children[0];
    assert_eq!(inner.level, 1);
    assert_eq!(plain_text(&inner.items[0].content), "inner");
}

#[test]
fn test_pre_becomes_code_lines() {
    let doc = parse_html_str("<pre>let a = 1;\nlet b = 2;</pre>").expect("html parses");
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    assert!(paragraph.hard_breaks);
    assert_eq!(
        paragraph.content,
        vec![
            Inline::Code("let a = 1;".to_string()),
            Inline::Break,
            Inline::Code("let b = 2;".to_string()),
        ]
    );
}

#[test]
fn test_containers_are_walked_and_unknown_elements_skipped() {
    let doc = parse_html_str(
        "<div><section><h1>Deep</h1></section><figure>ignored</figure><p>kept</p></div><hr><blockquote>quoted</blockquote>",
    )
    .expect("html parses");

    assert_eq!(doc.blocks.len(), 4);
    assert!(matches!(&doc.blocks[0], Block::Heading(h) if plain_text(&h.content) == "Deep"));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(p) if plain_text(&p.content) == "kept"));
    assert_eq!(doc.blocks[2], Block::Rule);
    assert!(matches!(&doc.blocks[3], Block::Quote(q) if plain_text(&q.content) == "quoted"));
}

#[test]
fn test_ragged_table_rows_survive() {
    let doc = parse_html_str("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td></tr></table>")
        .expect("html parses");

    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.rows[1].cells.len(), 1);
    assert_eq!(
        table.grid(),
        vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["1".to_string()]
        ]
    );
}

#[test]
fn test_commonmark_goes_through_the_html_reader() {
    let registry = mdoffice_babel::FormatRegistry::default();
    let doc = registry
        .parse("# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n", "commonmark")
        .expect("commonmark parses");

    assert!(matches!(&doc.blocks[0], Block::Heading(h) if plain_text(&h.content) == "Title"));
    assert!(matches!(&doc.blocks[1], Block::Table(t) if t.rows.len() == 2));
}
