use mdoffice_babel::format::Format;
use mdoffice_babel::formats::markdown::{parse_markdown, MarkdownFormat};
use mdoffice_babel::ir::nodes::{plain_text, Block, Inline, List, TableCellAlignment};

fn list_at(blocks: &[Block], index: usize) -> &List {
    match &blocks[index] {
        Block::List(list) => list,
        other => panic!("expected list at {index}, got {other:?}"),
    }
}

#[test]
fn test_blank_line_runs_keep_spacing() {
    let doc = parse_markdown("# Title\n\nIntro text\n\n\n\nAfter the gap");

    assert_eq!(doc.blocks.len(), 5);
    assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 1));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(p) if plain_text(&p.content) == "Intro text"));
    assert!(matches!(&doc.blocks[2], Block::Paragraph(p) if p.is_empty()));
    assert!(matches!(&doc.blocks[3], Block::Paragraph(p) if p.is_empty()));
    assert!(matches!(&doc.blocks[4], Block::Paragraph(p) if plain_text(&p.content) == "After the gap"));
}

#[test]
fn test_heading_levels_are_capped() {
    let doc = parse_markdown("### Three\n######## Eight");
    let levels: Vec<u8> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Heading(h) => h.level,
            other => panic!("expected heading, got {other:?}"),
        })
        .collect();
    assert_eq!(levels, vec![3, 6]);
}

#[test]
fn test_three_space_indentation_nests_lists() {
    let doc = parse_markdown("- one\n   - nested\n      1. deep\n- two");

    assert_eq!(doc.blocks.len(), 1);
    let outer = list_at(&doc.blocks, 0);
    assert!(!outer.ordered);
    assert_eq!(outer.level, 0);
    assert_eq!(outer.items.len(), 2);
    assert_eq!(plain_text(&outer.items[1].content), "two");

    let nested = &outer.items[0].children[0];
    assert_eq!(nested.level, 1);
    assert_eq!(plain_text(&nested.items[0].content), "nested");

    let deep = &nested.items[0].children[0];
    assert!(deep.ordered);
    assert_eq!(deep.level, 2);
    assert_eq!(plain_text(&deep.items[0].content), "deep");
}

#[test]
fn test_marker_change_starts_a_new_list() {
    let doc = parse_markdown("- bullet\n1. numbered");
    assert_eq!(doc.blocks.len(), 2);
    assert!(!list_at(&doc.blocks, 0).ordered);
    assert!(list_at(&doc.blocks, 1).ordered);
}

#[test]
fn test_blank_line_ends_a_list() {
    let doc = parse_markdown("1. first\n\n2. second");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(list_at(&doc.blocks, 0).items.len(), 1);
    assert_eq!(list_at(&doc.blocks, 1).items.len(), 1);
}

#[test]
fn test_list_markers_win_over_spaced_rules() {
    let doc = parse_markdown("---\n- - -\n***");
    assert_eq!(doc.blocks.len(), 3);
    assert_eq!(doc.blocks[0], Block::Rule);
    assert_eq!(plain_text(&list_at(&doc.blocks, 1).items[0].content), "- -");
    assert_eq!(doc.blocks[2], Block::Rule);
}

#[test]
fn test_indentation_below_one_level_is_a_sibling() {
    let doc = parse_markdown("- a\n  - b\n - c");
    let list = list_at(&doc.blocks, 0);
    assert_eq!(list.items.len(), 3);
    assert!(list.items.iter().all(|item| item.children.is_empty()));
}

#[test]
fn test_four_then_three_spaces_share_one_nested_list() {
    let doc = parse_markdown("1. a\n    1. b\n   1. c\n2. d");
    let list = list_at(&doc.blocks, 0);
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].children.len(), 1);
    let nested = &list.items[0].children[0];
    assert_eq!(nested.items.len(), 2);
    assert_eq!(plain_text(&nested.items[1].content), "c");
}

#[test]
fn test_quote_keeps_inline_styles() {
    let doc = parse_markdown("> quoted **bold**");
    let Block::Quote(quote) = &doc.blocks[0] else {
        panic!("expected quote");
    };
    assert_eq!(
        quote.content,
        vec![
            Inline::Text("quoted ".to_string()),
            Inline::Bold("bold".to_string())
        ]
    );
}

#[test]
fn test_two_trailing_spaces_glue_lines() {
    let doc = parse_markdown("line one  \nline two\nline three");

    assert_eq!(doc.blocks.len(), 2);
    let Block::Paragraph(first) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    assert!(first.hard_breaks);
    assert_eq!(
        first.content,
        vec![
            Inline::Text("line one".to_string()),
            Inline::Break,
            Inline::Text("line two".to_string()),
        ]
    );
    assert!(matches!(&doc.blocks[1], Block::Paragraph(p) if !p.hard_breaks));
}

#[test]
fn test_pipe_table_alignment() {
    let md = "| Left | Center | Right |\n| :--- | :----: | ----: |\n| L | C | R |";
    let doc = MarkdownFormat.parse(md).expect("markdown always parses");

    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.rows.len(), 2);
    let aligns: Vec<_> = table.rows[1].cells.iter().map(|c| c.align).collect();
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
fn test_single_pipe_line_is_a_paragraph() {
    let doc = parse_markdown("| lonely |");
    assert!(matches!(&doc.blocks[0], Block::Paragraph(p) if plain_text(&p.content) == "| lonely |"));
}

#[test]
fn test_block_json_shape() {
    let doc = parse_markdown("## Totals\n\n- a");
    let json = serde_json::to_value(&doc).expect("document serializes");
    assert_eq!(json["blocks"][0]["type"], "heading");
    assert_eq!(json["blocks"][0]["level"], 2);
    assert_eq!(json["blocks"][1]["type"], "list");
    assert_eq!(json["blocks"][1]["items"][0]["content"][0]["value"], "a");
}

#[test]
fn test_heading_then_table() {
    let doc = parse_markdown("# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 1 && plain_text(&h.content) == "Title"));
    let Block::Table(table) = &doc.blocks[1] else {
        panic!("expected table");
    };
    assert_eq!(
        table.grid(),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["1".to_string(), "2".to_string()]
        ]
    );
}
