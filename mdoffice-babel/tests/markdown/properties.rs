use mdoffice_babel::formats::markdown::{parse_inline, parse_markdown};
use mdoffice_babel::ir::nodes::{plain_text, Block, Inline, List};
use proptest::prelude::*;

/// Items of a list tree in reading order, with their nesting level.
fn flatten(list: &List, out: &mut Vec<(usize, String)>) {
    for item in &list.items {
        out.push((list.level, plain_text(&item.content)));
        for child in &item.children {
            flatten(child, out);
        }
    }
}

/// Depth sequences that start at 0 and never jump more than one level deeper.
fn depth_sequence() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..4, 1..12).prop_map(|raw| {
        let mut depths = Vec::with_capacity(raw.len());
        let mut previous = 0;
        for (i, wanted) in raw.into_iter().enumerate() {
            let depth = if i == 0 { 0 } else { wanted.min(previous + 1) };
            depths.push(depth);
            previous = depth;
        }
        depths
    })
}

/// Indent widths whose level (`width / 3`) follows [`depth_sequence`], with up to two
/// extra spaces of slack inside each level.
fn indent_widths() -> impl Strategy<Value = Vec<usize>> {
    (depth_sequence(), prop::collection::vec(0usize..3, 12)).prop_map(|(depths, slack)| {
        depths
            .into_iter()
            .zip(slack)
            .map(|(depth, extra)| depth * 3 + extra)
            .collect()
    })
}

proptest! {
    #[test]
    fn plain_words_are_one_text_span(text in "[a-zA-Z0-9][a-zA-Z0-9 ,.]{0,40}") {
        prop_assert_eq!(parse_inline(&text), vec![Inline::Text(text.clone())]);
    }

    #[test]
    fn span_text_concatenates_to_the_unmarked_source(
        before in "[a-z ]{0,10}",
        bold in "[a-z]{1,10}",
        middle in "[a-z ]{0,10}",
        code in "[a-z]{1,10}",
        after in "[a-z ]{0,10}",
    ) {
        let source = format!("{before}**{bold}**{middle}`{code}`{after}");
        let spans = parse_inline(&source);

        prop_assert_eq!(plain_text(&spans), format!("{before}{bold}{middle}{code}{after}"));
        prop_assert!(spans.contains(&Inline::Bold(bold.clone())));
        prop_assert!(spans.contains(&Inline::Code(code.clone())));
    }

    #[test]
    fn escaped_markers_stay_in_the_text(
        before in "[a-z ]{0,10}",
        escaped in prop::sample::select(vec!['*', '`', '[', ']', '(', ')', '\\', '_', '#']),
        bold in "[a-z]{1,10}",
        code in "[a-z]{1,10}",
    ) {
        let source = format!("{before}\\{escaped}**{bold}**\\{escaped}`{code}`");
        let spans = parse_inline(&source);

        prop_assert_eq!(plain_text(&spans), format!("{before}{escaped}{bold}{escaped}{code}"));
        prop_assert!(spans.contains(&Inline::Bold(bold.clone())));
        prop_assert!(spans.contains(&Inline::Code(code.clone())));
    }

    #[test]
    fn list_levels_follow_indentation(depths in depth_sequence()) {
        let source: String = depths
            .iter()
            .enumerate()
            .map(|(i, depth)| format!("{}- item{i}\n", "   ".repeat(*depth)))
            .collect();
        let doc = parse_markdown(&source);

        prop_assert_eq!(doc.blocks.len(), 1);
        let Block::List(list) = &doc.blocks[0] else {
            return Err(TestCaseError::fail("expected a single list"));
        };
        let mut items = Vec::new();
        flatten(list, &mut items);

        let expected: Vec<(usize, String)> = depths
            .iter()
            .enumerate()
            .map(|(i, depth)| (*depth, format!("item{i}")))
            .collect();
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn list_levels_are_indent_width_over_three(widths in indent_widths()) {
        let source: String = widths
            .iter()
            .enumerate()
            .map(|(i, width)| format!("{}1. item{i}\n", " ".repeat(*width)))
            .collect();
        let doc = parse_markdown(&source);

        prop_assert_eq!(doc.blocks.len(), 1);
        let Block::List(list) = &doc.blocks[0] else {
            return Err(TestCaseError::fail("expected a single list"));
        };
        let mut items = Vec::new();
        flatten(list, &mut items);

        let expected: Vec<(usize, String)> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| (width / 3, format!("item{i}")))
            .collect();
        prop_assert_eq!(items, expected);
    }
}
